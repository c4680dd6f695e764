pub mod alert_repo;
pub use alert_repo::AlertRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod driver_repo;
pub use driver_repo::DriverRepository;
pub mod embarque_repo;
pub use embarque_repo::EmbarqueRepository;
pub mod field_config_repo;
pub use field_config_repo::FieldConfigRepository;
pub mod matching_repo;
pub use matching_repo::MatchingRepository;
pub mod ranking_repo;
pub use ranking_repo::RankingRepository;
