mod init;
pub mod meetings;
pub mod store;

pub use init::{migrate, open_db};
pub use meetings::MeetingRepository;
pub use store::{MeetingStore, SqliteMeetingStore};
