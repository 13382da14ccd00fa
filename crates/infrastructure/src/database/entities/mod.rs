pub mod cities;
pub mod locations;
pub mod users;
pub mod wards;
pub mod work_entries;
pub mod work_entry_media;
pub mod zones;
