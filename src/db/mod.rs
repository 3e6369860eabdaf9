pub mod user_repo;
pub use user_repo::UserRepository;
pub mod library_repo;
pub use library_repo::LibraryRepository;
pub mod student_repo;
pub use student_repo::StudentRepository;
pub mod seating_repo;
pub use seating_repo::SeatingRepository;
pub mod subscription_repo;
pub use subscription_repo::SubscriptionRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod expense_repo;
pub use expense_repo::ExpenseRepository;
