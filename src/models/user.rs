use serde::{Deserialize, Serialize};
use super::de;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    // Any non-admin role gets the employee dashboard
    #[default]
    #[serde(other)]
    Employee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

/// A dashboard account. The password is write-only and never part of this type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    #[serde(deserialize_with = "de::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub username: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// Entry of the assignable-employee list.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    #[serde(deserialize_with = "de::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_round_trips_through_session_json() {
        let user: User = serde_json::from_value(json!({
            "id": "4", "name": "meera", "username": "meera@office.in", "role": "admin"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.initial(), "M");

        let stored = serde_json::to_value(&user).unwrap();
        assert_eq!(stored["id"], json!(4));
        assert_eq!(serde_json::from_value::<User>(stored).unwrap(), user);
    }

    #[test]
    fn unknown_roles_fall_back_to_employee() {
        let user: User = serde_json::from_value(json!({"id": 2, "name": "x", "role": "manager"})).unwrap();
        assert_eq!(user.role, Role::Employee);
    }
}
