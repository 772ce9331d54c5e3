use std::path::Path;

use kcadmin_model::types::{CertificateRepresentation, KeyStoreConfig};
use reqwest::Method;

use crate::{
    client::{file_form, KeycloakClient},
    error::Result,
};

impl KeycloakClient {
    /// Certificate stored in the client attribute `attribute`, e.g. `jwt.credential`.
    pub async fn key_info(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        attribute: &str,
    ) -> Result<CertificateRepresentation> {
        self.get(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/certificates/{attribute}"),
        )
        .await
    }

    pub async fn key_store_for_client(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        attribute: &str,
        key_store_config: &KeyStoreConfig,
    ) -> Result<Vec<u8>> {
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!(
                    "/admin/realms/{realm}/clients/{client_id}/certificates/{attribute}/download"
                ),
            )
            .await?
            .json(key_store_config);
        self.bytes(request).await
    }

    pub async fn generate_certificate_with_new_key_pair(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        attribute: &str,
    ) -> Result<CertificateRepresentation> {
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!(
                    "/admin/realms/{realm}/clients/{client_id}/certificates/{attribute}/generate"
                ),
            )
            .await?
            .body("");
        self.json(request).await
    }

    pub async fn generate_certificate_with_new_key_pair_and_key_store(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        attribute: &str,
        key_store_config: &KeyStoreConfig,
    ) -> Result<Vec<u8>> {
        let request = self
            .request(
                Method::POST,
                authentication_realm,
                &format!(
                    "/admin/realms/{realm}/clients/{client_id}/certificates/{attribute}/generate-and-download"
                ),
            )
            .await?
            .json(key_store_config);
        self.bytes(request).await
    }

    /// Uploads the key store at `file` holding certificate and private key.
    pub async fn upload_certificate_with_private_key(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        attribute: &str,
        file: impl AsRef<Path>,
    ) -> Result<CertificateRepresentation> {
        let form = file_form(file.as_ref()).await?;
        self.post_multipart(
            authentication_realm,
            &format!("/admin/realms/{realm}/clients/{client_id}/certificates/{attribute}/upload"),
            form,
        )
        .await
    }

    pub async fn upload_certificate_without_private_key(
        &self,
        authentication_realm: &str,
        realm: &str,
        client_id: &str,
        attribute: &str,
        file: impl AsRef<Path>,
    ) -> Result<CertificateRepresentation> {
        let form = file_form(file.as_ref()).await?;
        self.post_multipart(
            authentication_realm,
            &format!(
                "/admin/realms/{realm}/clients/{client_id}/certificates/{attribute}/upload-certificate"
            ),
            form,
        )
        .await
    }
}
