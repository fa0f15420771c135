//! Data models
//!
//! This module contains all data structures used throughout the GlobalNest
//! service. Models represent:
//! - Database entities (User, Profile, HousingListing, JobListing, Mentor,
//!   Review, Booking, Feedback, University, Student)
//! - API request/response types
//! - Internal data transfer objects

mod booking;
mod feedback;
mod housing;
mod job;
mod mentor;
mod profile;
mod review;
mod session;
mod university;
mod user;

pub use booking::{Booking, BookingStatus, CreateBookingInput, PaymentStatus};
pub use feedback::{CreateFeedbackInput, Feedback};
pub use housing::{CreateHousingInput, HousingListing, UpdateHousingInput};
pub use job::{CreateJobInput, JobListing, JobType, UpdateJobInput};
pub use mentor::{Availability, CreateMentorInput, Mentor};
pub use profile::{Location, Profile, UpdateProfileInput};
pub use review::{Review, SubmitReviewInput, DEFAULT_RATING, MIN_COMMENT_LENGTH};
pub use session::Session;
pub use university::{Student, StudentStatus, University};
pub use user::{User, UserRole};
