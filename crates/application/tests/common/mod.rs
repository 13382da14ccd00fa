//! In-memory implementations of the domain ports shared by the service tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use domain::DomainError;
use domain::entry::{WorkEntry, WorkEntryMedia, WorkEntryRepository};
use domain::platform::{AuthAdmin, IdentityProvider, UploadSigner};
use domain::reference::{City, Location, ReferenceKind, ReferenceRepository, Ward, Zone};
use domain::user::{AuthUser, Identity, NewAuthUser, Role, UserProfile, UserRepository};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct InMemoryReference {
    pub cities: Mutex<Vec<City>>,
    pub zones: Mutex<Vec<Zone>>,
    pub wards: Mutex<Vec<Ward>>,
    pub locations: Mutex<Vec<Location>>,
}

impl InMemoryReference {
    /// c1 (Nagpur) → z1 → w1 → l1, c2 (Pune) → z2 → w2 → l2
    pub fn seeded() -> Self {
        let repo = Self::default();
        for (c, name) in [("c1", "Nagpur"), ("c2", "Pune")] {
            repo.cities.lock().unwrap().push(City {
                id: c.into(),
                name: name.into(),
            });
        }
        for (z, c) in [("z1", "c1"), ("z2", "c2")] {
            repo.zones.lock().unwrap().push(Zone {
                id: z.into(),
                name: format!("Zone {z}"),
                city_id: c.into(),
            });
        }
        for (w, z) in [("w1", "z1"), ("w2", "z2")] {
            repo.wards.lock().unwrap().push(Ward {
                id: w.into(),
                name: format!("Ward {w}"),
                zone_id: z.into(),
            });
        }
        for (l, w) in [("l1", "w1"), ("l2", "w2")] {
            repo.locations.lock().unwrap().push(Location {
                id: l.into(),
                name: format!("Location {l}"),
                ward_id: w.into(),
            });
        }
        repo
    }
}

#[async_trait]
impl ReferenceRepository for InMemoryReference {
    async fn list_cities(&self) -> Result<Vec<City>, DomainError> {
        Ok(self.cities.lock().unwrap().clone())
    }
    async fn list_zones(&self) -> Result<Vec<Zone>, DomainError> {
        Ok(self.zones.lock().unwrap().clone())
    }
    async fn list_wards(&self) -> Result<Vec<Ward>, DomainError> {
        Ok(self.wards.lock().unwrap().clone())
    }
    async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        Ok(self.locations.lock().unwrap().clone())
    }
    async fn find_city(&self, id: &str) -> Result<Option<City>, DomainError> {
        Ok(self.cities.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }
    async fn find_zone(&self, id: &str) -> Result<Option<Zone>, DomainError> {
        Ok(self.zones.lock().unwrap().iter().find(|z| z.id == id).cloned())
    }
    async fn find_ward(&self, id: &str) -> Result<Option<Ward>, DomainError> {
        Ok(self.wards.lock().unwrap().iter().find(|w| w.id == id).cloned())
    }
    async fn find_location(&self, id: &str) -> Result<Option<Location>, DomainError> {
        Ok(self
            .locations
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }
    async fn insert_city(&self, city: &City) -> Result<(), DomainError> {
        self.cities.lock().unwrap().push(city.clone());
        Ok(())
    }
    async fn insert_zone(&self, zone: &Zone) -> Result<(), DomainError> {
        self.zones.lock().unwrap().push(zone.clone());
        Ok(())
    }
    async fn insert_ward(&self, ward: &Ward) -> Result<(), DomainError> {
        self.wards.lock().unwrap().push(ward.clone());
        Ok(())
    }
    async fn insert_location(&self, location: &Location) -> Result<(), DomainError> {
        self.locations.lock().unwrap().push(location.clone());
        Ok(())
    }
    async fn delete(&self, kind: ReferenceKind, id: &str) -> Result<bool, DomainError> {
        let removed = match kind {
            ReferenceKind::City => {
                let mut cities = self.cities.lock().unwrap();
                let before = cities.len();
                cities.retain(|c| c.id != id);
                before != cities.len()
            }
            ReferenceKind::Zone => {
                let mut zones = self.zones.lock().unwrap();
                let before = zones.len();
                zones.retain(|z| z.id != id);
                before != zones.len()
            }
            ReferenceKind::Ward => {
                let mut wards = self.wards.lock().unwrap();
                let before = wards.len();
                wards.retain(|w| w.id != id);
                before != wards.len()
            }
            ReferenceKind::Location => {
                let mut locations = self.locations.lock().unwrap();
                let before = locations.len();
                locations.retain(|l| l.id != id);
                before != locations.len()
            }
        };
        Ok(removed)
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    pub profiles: Mutex<Vec<UserProfile>>,
    pub fail_insert: AtomicBool,
}

impl InMemoryUsers {
    pub fn with(profiles: Vec<UserProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            fail_insert: AtomicBool::new(false),
        }
    }

    pub fn get(&self, id: &str) -> Option<UserProfile> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.get(id))
    }
    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, DomainError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }
    async fn list(&self) -> Result<Vec<UserProfile>, DomainError> {
        Ok(self.profiles.lock().unwrap().clone())
    }
    async fn list_by_role(
        &self,
        role: Role,
        city_id: Option<String>,
    ) -> Result<Vec<UserProfile>, DomainError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.role == role)
            .filter(|p| city_id.is_none() || p.city_id == city_id)
            .cloned()
            .collect())
    }
    async fn insert(&self, profile: &UserProfile) -> Result<(), DomainError> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("insert failed".into()));
        }
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(())
    }
    async fn set_temp_password(&self, id: &str, password: &str) -> Result<(), DomainError> {
        let mut profiles = self.profiles.lock().unwrap();
        match profiles.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.temp_password = Some(password.to_string());
                Ok(())
            }
            None => Err(DomainError::NotFound("User not found".into())),
        }
    }
    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut profiles = self.profiles.lock().unwrap();
        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        Ok(before != profiles.len())
    }
    async fn emails_with_prefix(
        &self,
        prefix: &str,
        domain: &str,
    ) -> Result<Vec<String>, DomainError> {
        let suffix = format!("@{domain}");
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.email.clone())
            .filter(|e| e.starts_with(prefix) && e.ends_with(&suffix))
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryEntries {
    pub entries: Mutex<Vec<WorkEntry>>,
    pub media: Mutex<Vec<WorkEntryMedia>>,
    pub fail_media: AtomicBool,
}

#[async_trait]
impl WorkEntryRepository for InMemoryEntries {
    async fn insert(&self, entry: &WorkEntry) -> Result<(), DomainError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
    async fn insert_media(&self, media: &[WorkEntryMedia]) -> Result<(), DomainError> {
        if self.fail_media.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("media insert failed".into()));
        }
        let entries = self.entries.lock().unwrap();
        if media
            .iter()
            .any(|m| !entries.iter().any(|e| e.id == m.work_entry_id))
        {
            return Err(DomainError::Storage("parent entry missing".into()));
        }
        self.media.lock().unwrap().extend_from_slice(media);
        Ok(())
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<WorkEntry>, DomainError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }
    async fn list(&self, city_id: Option<String>) -> Result<Vec<WorkEntry>, DomainError> {
        let mut rows: Vec<WorkEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| city_id.as_deref().is_none_or(|c| e.city_id == c))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.work_date.cmp(&a.work_date));
        Ok(rows)
    }
    async fn media_for(&self, entry_id: &str) -> Result<Vec<WorkEntryMedia>, DomainError> {
        let mut rows: Vec<WorkEntryMedia> = self
            .media
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.work_entry_id == entry_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.display_order);
        Ok(rows)
    }
    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        self.media.lock().unwrap().retain(|m| m.work_entry_id != id);
        Ok(before != entries.len())
    }
}

/// Token → account map standing in for the platform's identity endpoint.
#[derive(Default)]
pub struct FakeIdentity {
    pub tokens: HashMap<String, AuthUser>,
}

impl FakeIdentity {
    pub fn with(tokens: &[(&str, &str)]) -> Self {
        Self {
            tokens: tokens
                .iter()
                .map(|(token, id)| {
                    (
                        token.to_string(),
                        AuthUser {
                            id: id.to_string(),
                            email: format!("{id}@fieldops.local"),
                        },
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn resolve(&self, token: &str) -> Result<AuthUser, DomainError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| DomainError::Unauthorized("Unauthorized: Invalid token".into()))
    }
}

#[derive(Default)]
pub struct FakeAuthAdmin {
    pub created: Mutex<Vec<NewAuthUser>>,
    pub passwords: Mutex<HashMap<String, String>>,
    pub deleted: Mutex<Vec<String>>,
    pub registered: Mutex<Vec<String>>,
    pub fail_delete: AtomicBool,
    counter: AtomicUsize,
}

#[async_trait]
impl AuthAdmin for FakeAuthAdmin {
    async fn create_user(&self, user: &NewAuthUser) -> Result<AuthUser, DomainError> {
        let mut registered = self.registered.lock().unwrap();
        if registered.contains(&user.email) {
            return Err(DomainError::Conflict("Email already exists".into()));
        }
        registered.push(user.email.clone());
        self.created.lock().unwrap().push(user.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AuthUser {
            id: format!("auth-{n}"),
            email: user.email.clone(),
        })
    }
    async fn update_password(&self, user_id: &str, password: &str) -> Result<(), DomainError> {
        self.passwords
            .lock()
            .unwrap()
            .insert(user_id.to_string(), password.to_string());
        Ok(())
    }
    async fn delete_user(&self, user_id: &str) -> Result<(), DomainError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(DomainError::Platform("auth service down".into()));
        }
        self.deleted.lock().unwrap().push(user_id.to_string());
        Ok(())
    }
}

pub struct FakeSigner;

impl UploadSigner for FakeSigner {
    fn presign_put(&self, key: &str, expires_secs: u64) -> Result<String, DomainError> {
        Ok(format!("https://storage.test/bucket/{key}?X-Amz-Expires={expires_secs}"))
    }
    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }
}

pub fn profile(id: &str, role: Role, city: Option<&str>) -> UserProfile {
    UserProfile {
        id: id.into(),
        email: format!("{id}@fieldops.local"),
        full_name: format!("User {id}"),
        role,
        city_id: city.map(String::from),
        temp_password: None,
        created_at: Utc::now(),
    }
}

pub fn identity(id: &str, role: Role, city: Option<&str>) -> Identity {
    profile(id, role, city).identity()
}
