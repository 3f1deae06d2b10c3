use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use parking_lot::RwLock;

use crate::models::{StaffProfile, StaffRole, StaffUpdate};

/// Staff accounts with a separate plaintext password map. A stand-in
/// for a real credential store; password policy (minimum length) is
/// enforced by the route, not here.
pub struct StaffDirectory {
    profiles: RwLock<Vec<StaffProfile>>,
    passwords: RwLock<HashMap<String, String>>,
}

impl StaffDirectory {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(seed_profiles()),
            passwords: RwLock::new(seed_passwords()),
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<StaffProfile> {
        self.profiles.read().iter().find(|s| s.id == id).cloned()
    }

    pub fn find_by_username(&self, username: &str) -> Option<StaffProfile> {
        self.profiles
            .read()
            .iter()
            .find(|s| s.username == username)
            .cloned()
    }

    /// Merges profile fields. Username and role are immutable.
    pub fn update(&self, id: &str, updates: StaffUpdate) -> Option<StaffProfile> {
        let mut profiles = self.profiles.write();
        let profile = profiles.iter_mut().find(|s| s.id == id)?;

        if let Some(v) = updates.name {
            profile.name = v;
        }
        if let Some(v) = updates.email {
            profile.email = Some(v);
        }
        if let Some(v) = updates.phone {
            profile.phone = Some(v);
        }
        profile.updated_at = Utc::now();
        Some(profile.clone())
    }

    pub fn verify_password(&self, id: &str, password: &str) -> bool {
        self.passwords.read().get(id).is_some_and(|p| p == password)
    }

    pub fn update_password(&self, id: &str, new_password: &str) -> bool {
        if self.find_by_id(id).is_none() {
            return false;
        }
        self.passwords
            .write()
            .insert(id.to_string(), new_password.to_string());
        true
    }

    pub fn reset(&self) {
        *self.profiles.write() = seed_profiles();
        *self.passwords.write() = seed_passwords();
    }
}

impl Default for StaffDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_profiles() -> Vec<StaffProfile> {
    let seeded_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    vec![
        StaffProfile {
            id: "staff_001".into(),
            username: "staff".into(),
            name: "Staff User".into(),
            email: Some("staff@lumina.example".into()),
            phone: Some("0812345678".into()),
            role: StaffRole::Staff,
            created_at: seeded_at,
            updated_at: seeded_at,
        },
        StaffProfile {
            id: "staff_002".into(),
            username: "admin".into(),
            name: "Admin User".into(),
            email: Some("admin@lumina.example".into()),
            phone: Some("0823456789".into()),
            role: StaffRole::Admin,
            created_at: seeded_at,
            updated_at: seeded_at,
        },
    ]
}

fn seed_passwords() -> HashMap<String, String> {
    HashMap::from([
        ("staff_001".to_string(), "password".to_string()),
        ("staff_002".to_string(), "admin123".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_password_checks_plaintext_equality() {
        let directory = StaffDirectory::new();

        assert!(directory.verify_password("staff_001", "password"));
        assert!(!directory.verify_password("staff_001", "wrong"));
        assert!(!directory.verify_password("staff_missing", "password"));
    }

    #[test]
    fn update_password_requires_existing_profile() {
        let directory = StaffDirectory::new();

        assert!(directory.update_password("staff_001", "newpass"));
        assert!(directory.verify_password("staff_001", "newpass"));
        assert!(!directory.update_password("staff_missing", "newpass"));
    }

    #[test]
    fn update_leaves_username_and_role_alone() {
        let directory = StaffDirectory::new();
        let updated = directory
            .update(
                "staff_001",
                StaffUpdate {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.username, "staff");
        assert_eq!(updated.role, StaffRole::Staff);
    }

    #[test]
    fn reset_restores_seed_credentials() {
        let directory = StaffDirectory::new();
        directory.update_password("staff_001", "changed");
        directory.reset();

        assert!(directory.verify_password("staff_001", "password"));
    }
}
