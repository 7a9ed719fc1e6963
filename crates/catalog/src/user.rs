use serde::{Deserialize, Serialize};

use stockbook_access::{Actor, Role, hash_credential};
use stockbook_core::{CategoryId, EmailAddress, Error, Result};

use crate::serde_util::double_option;

/// A user record, keyed by lowercased email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: EmailAddress,
    pub display_name: String,
    pub role: Role,
    /// One-way digest of the login credential. Never serialized to callers;
    /// strip via [`User::public`] before returning a user anywhere.
    pub credential_hash: String,
    pub home_area: Option<String>,
    /// Categories this user is authorized to handle. Meaningful for Staff;
    /// administrators and managers are not restricted by it.
    pub category_ids: Vec<CategoryId>,
    /// Eligibility to be the receiving party of a purchase request.
    pub can_receive_orders: bool,
}

impl User {
    /// The externally visible view: same record, credential stripped.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            home_area: self.home_area.clone(),
            category_ids: self.category_ids.clone(),
            can_receive_orders: self.can_receive_orders,
        }
    }
}

impl Actor for User {
    fn role(&self) -> Role {
        self.role
    }

    fn can_receive_orders(&self) -> bool {
        self.can_receive_orders
    }
}

/// A user as returned to callers: no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub email: EmailAddress,
    pub display_name: String,
    pub role: Role,
    pub home_area: Option<String>,
    pub category_ids: Vec<CategoryId>,
    pub can_receive_orders: bool,
}

/// Input for creating a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub email: EmailAddress,
    pub display_name: String,
    pub role: Role,
    /// Plaintext credential; hashed before anything is stored.
    pub credential: String,
    #[serde(default)]
    pub home_area: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    #[serde(default)]
    pub can_receive_orders: bool,
}

impl NewUser {
    pub fn build(self) -> Result<User> {
        let display_name = self.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(Error::validation("display name cannot be empty"));
        }
        let credential_hash = hash_credential(&self.credential)?;
        Ok(User {
            email: self.email,
            display_name,
            role: self.role,
            credential_hash,
            home_area: self.home_area,
            category_ids: self.category_ids,
            can_receive_orders: self.can_receive_orders,
        })
    }
}

/// Partial update for a user. The email is the key and cannot change here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub home_area: Option<Option<String>>,
    #[serde(default)]
    pub category_ids: Option<Vec<CategoryId>>,
    #[serde(default)]
    pub can_receive_orders: Option<bool>,
}

impl UserUpdate {
    pub fn apply(self, user: &mut User) -> Result<()> {
        if let Some(display_name) = self.display_name {
            let display_name = display_name.trim().to_string();
            if display_name.is_empty() {
                return Err(Error::validation("display name cannot be empty"));
            }
            user.display_name = display_name;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(credential) = self.credential {
            user.credential_hash = hash_credential(&credential)?;
        }
        if let Some(home_area) = self.home_area {
            user.home_area = home_area;
        }
        if let Some(category_ids) = self.category_ids {
            user.category_ids = category_ids;
        }
        if let Some(flag) = self.can_receive_orders {
            user.can_receive_orders = flag;
        }
        Ok(())
    }
}
