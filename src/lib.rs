#[cfg(feature = "model")]
pub use kcadmin_model as model;

#[cfg(feature = "client")]
pub use kcadmin_client as client;
