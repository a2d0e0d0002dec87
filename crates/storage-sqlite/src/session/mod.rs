mod repository;

pub use repository::SessionRepository;
