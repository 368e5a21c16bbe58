//! Application layer for Fabula: the use case that ties emoji drawing, story
//! generation, and session persistence together.

pub mod story_usecase;

pub use story_usecase::{NewSessionRequest, StorySessionService};
