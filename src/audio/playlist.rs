//! Radio and background-music state, independent of any audio backend.
//!
//! The audio systems in the parent module mirror these into Bevy sinks.

use bevy::prelude::*;

/// The car radio: a looping playlist with its own volume.
#[derive(Resource, Debug, Clone)]
pub struct RadioPlaylist {
    tracks: Vec<String>,
    current: usize,
    volume: f32,
    playing: bool,
    /// Bumped every time a track should start from the beginning.
    generation: u64,
}

impl RadioPlaylist {
    pub fn new(tracks: Vec<String>, volume: f32) -> Self {
        Self {
            tracks,
            current: 0,
            volume: volume.clamp(0.0, 1.0),
            playing: false,
            generation: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_track(&self) -> Option<&str> {
        self.tracks.get(self.current).map(String::as_str)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn volume_percent(&self) -> u32 {
        (self.volume * 100.0).round() as u32
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pause if playing, otherwise resume (or start) the current track.
    pub fn toggle_play(&mut self) {
        if self.is_empty() {
            return;
        }
        self.playing = !self.playing;
    }

    pub fn next(&mut self) {
        if self.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.tracks.len();
        self.restart();
    }

    pub fn previous(&mut self) {
        if self.is_empty() {
            return;
        }
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.tracks.len() - 1);
        self.restart();
    }

    pub fn volume_up(&mut self, step: f32) {
        self.adjust_volume(step);
    }

    pub fn volume_down(&mut self, step: f32) {
        self.adjust_volume(-step);
    }

    fn adjust_volume(&mut self, delta: f32) {
        if self.is_empty() {
            return;
        }
        // Round to whole percents so repeated steps land exactly on 0 and 1.
        let volume = ((self.volume + delta) * 100.0).round() / 100.0;
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn restart(&mut self) {
        self.playing = true;
        self.generation += 1;
    }
}

/// Looping background music, started by the first user interaction.
#[derive(Resource, Debug, Clone, Default)]
pub struct BgmState {
    interacted: bool,
    requested: bool,
    muted: bool,
}

impl BgmState {
    /// The user pressed a key or clicked. Only the first call has an effect.
    pub fn on_interaction(&mut self) {
        if !self.interacted {
            self.interacted = true;
            self.requested = true;
        }
    }

    /// Flip mute. Unmuting also asks for playback in case it never started.
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            self.requested = true;
        } else {
            self.muted = true;
        }
        self.interacted = true;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether the BGM should be playing (possibly muted).
    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Effective output volume given the configured base volume.
    pub fn output_volume(&self, base: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            base
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.muted {
            "Unmute BGM"
        } else {
            "Mute BGM"
        }
    }
}
