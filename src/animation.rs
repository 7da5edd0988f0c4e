//! Sprite animation playback
//!
//! Clips are pure timing data (frame count, per-frame duration, looping);
//! the images themselves belong to the renderer. Clips are keyed
//! `"<tag>/<action>"`, matching `KinematicEntity::action_key`.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::KinematicEntity;

/// Errors raised while loading animation data
#[derive(Debug)]
pub enum AnimationError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationError::Io(e) => write!(f, "I/O error: {e}"),
            AnimationError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for AnimationError {}

impl From<std::io::Error> for AnimationError {
    fn from(e: std::io::Error) -> Self {
        AnimationError::Io(e)
    }
}

impl From<serde_json::Error> for AnimationError {
    fn from(e: serde_json::Error) -> Self {
        AnimationError::Json(e)
    }
}

/// Timing for one animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub frames: usize,
    /// Seconds each frame stays on screen
    #[serde(rename = "img_dur", default = "default_frame_duration")]
    pub frame_duration: f32,
    #[serde(rename = "loop", default = "default_looping")]
    pub looping: bool,
}

fn default_frame_duration() -> f32 {
    0.1
}

fn default_looping() -> bool {
    true
}

impl AnimationClip {
    pub fn new(frames: usize, frame_duration: f32, looping: bool) -> Self {
        Self {
            frames,
            frame_duration,
            looping,
        }
    }

    /// Single still frame
    pub fn still() -> Self {
        Self::new(1, default_frame_duration(), true)
    }
}

/// Playback state of one clip
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub clip: AnimationClip,
    frame: usize,
    elapsed: f32,
    /// Set once a non-looping clip reaches its last frame
    pub done: bool,
}

impl Animation {
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            frame: 0,
            elapsed: 0.0,
            done: false,
        }
    }

    /// Index of the frame to draw
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 || self.clip.frames == 0 || self.done {
            return;
        }
        self.elapsed += dt;

        while self.elapsed >= self.clip.frame_duration {
            if self.clip.frame_duration <= 0.0 {
                break;
            }
            self.elapsed -= self.clip.frame_duration;
            if self.clip.looping {
                self.frame = (self.frame + 1) % self.clip.frames;
            } else if self.frame + 1 >= self.clip.frames {
                self.frame = self.clip.frames - 1;
                self.done = true;
                break;
            } else {
                self.frame += 1;
            }
        }

        if !self.clip.looping && self.frame + 1 >= self.clip.frames {
            self.done = true;
        }
    }
}

/// Clip table keyed by `"<tag>/<action>"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationSet {
    clips: HashMap<String, AnimationClip>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, clip: AnimationClip) {
        self.clips.insert(key.into(), clip);
    }

    pub fn get(&self, key: &str) -> Option<&AnimationClip> {
        self.clips.get(key)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, AnimationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnimationError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let set = Self::from_json(&json)?;
        log::info!("Loaded {} animation clips from {}", set.len(), path.as_ref().display());
        Ok(set)
    }

    /// Clips for the built-in player sprite
    pub fn player_defaults() -> Self {
        let mut set = Self::new();
        set.insert("player/idle", AnimationClip::new(22, 0.1, true));
        set.insert("player/run", AnimationClip::new(8, 0.066, true));
        set.insert("player/jump", AnimationClip::still());
        set
    }
}

/// Tracks which clip an entity is playing
#[derive(Debug, Clone, PartialEq)]
pub struct Animator {
    action: String,
    pub animation: Animation,
}

impl Animator {
    pub fn new(action: impl Into<String>, set: &AnimationSet) -> Self {
        let action = action.into();
        let animation = Animation::new(Self::clip_for(&action, set));
        Self { action, animation }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Switch clips; playback restarts only when the action changes
    pub fn set_action(&mut self, action: &str, set: &AnimationSet) {
        if self.action != action {
            self.action = action.to_string();
            self.animation = Animation::new(Self::clip_for(action, set));
        }
    }

    /// Follow an entity's derived animation state and advance playback
    pub fn follow(&mut self, entity: &KinematicEntity, set: &AnimationSet, dt: f32) {
        self.set_action(&entity.action_key(), set);
        self.animation.update(dt);
    }

    fn clip_for(action: &str, set: &AnimationSet) -> AnimationClip {
        match set.get(action) {
            Some(clip) => *clip,
            None => {
                log::debug!("No clip for {action}, showing a still frame");
                AnimationClip::still()
            }
        }
    }
}
