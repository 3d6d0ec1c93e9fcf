//! Wayfarer: Quest State Machine bounded context.
//!
//! Interprets the quest condition language over the story state: gates on
//! starting a quest, which branches are open, which branch the player
//! commits to, and the circumstances that fail a quest. Quests move
//! `not_started -> active -> {completed | failed}`; a failed quest returns
//! to `active` only through an explicit reactivation.

pub mod application;
pub mod domain;
