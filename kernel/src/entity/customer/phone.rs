use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct CustomerPhone(String);

impl CustomerPhone {
    pub fn new(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }
}
