//! Audio boundary
//!
//! The simulation only names cues and tracks; an [`AudioSink`] does the
//! actual playback. [`AudioManager`] sits in between and owns volume, mute
//! and "one background track at a time".

use crate::settings::Settings;
use crate::sim::{Cue, GameEvent, Track};

/// Playback backend (fire-and-forget, never blocks the tick)
pub trait AudioSink {
    /// Play a one-shot cue
    fn play(&mut self, cue: Cue, volume: f32);
    /// Start looping a background track
    fn start_loop(&mut self, track: Track, volume: f32);
    /// Stop the current background track
    fn stop_loop(&mut self);
    /// Change the looping track's volume
    fn set_loop_volume(&mut self, _volume: f32) {}
}

/// Backend that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _cue: Cue, _volume: f32) {}
    fn start_loop(&mut self, _track: Track, _volume: f32) {}
    fn stop_loop(&mut self) {}
}

/// Backend that reports playback through the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: Cue, volume: f32) {
        log::debug!("♪ {:?} @ {:.2}", cue, volume);
    }

    fn start_loop(&mut self, track: Track, volume: f32) {
        log::info!("Music: {:?} @ {:.2}", track, volume);
    }

    fn stop_loop(&mut self) {
        log::info!("Music stopped");
    }

    fn set_loop_volume(&mut self, volume: f32) {
        log::debug!("Music volume {:.2}", volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    current: Option<Track>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        let mut manager = Self {
            sink,
            current: None,
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Pick up new volume/mute preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.set_muted(settings.muted);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if self.current.is_some() {
            let volume = self.track_volume();
            self.sink.set_loop_volume(volume);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn cue_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn track_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Play a one-shot cue
    pub fn play_cue(&mut self, cue: Cue) {
        let volume = self.cue_volume();
        if volume <= 0.0 {
            return;
        }
        self.sink.play(cue, volume);
    }

    /// Switch the background track. Already playing it is a no-op.
    pub fn start_track(&mut self, track: Track) {
        if self.current == Some(track) {
            return;
        }
        self.stop_track();
        let volume = self.track_volume();
        self.sink.start_loop(track, volume);
        self.current = Some(track);
    }

    pub fn stop_track(&mut self) {
        if self.current.take().is_some() {
            self.sink.stop_loop();
        }
    }

    pub fn current_track(&self) -> Option<Track> {
        self.current
    }

    /// Route a tick's audio events to the sink
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::Cue(cue) => self.play_cue(cue),
                GameEvent::Track(track) => self.start_track(track),
                _ => {}
            }
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: Cue, volume: f32) {
            self.log.push(format!("play {:?} {:.3}", cue, volume));
        }
        fn start_loop(&mut self, track: Track, volume: f32) {
            self.log.push(format!("start {:?} {:.3}", track, volume));
        }
        fn stop_loop(&mut self) {
            self.log.push("stop".to_string());
        }
    }

    #[test]
    fn test_same_track_is_noop() {
        let mut audio = AudioManager::new(Recorder::default(), &Settings::default());
        audio.start_track(Track::Normal);
        audio.start_track(Track::Normal);
        audio.start_track(Track::Slide);
        assert_eq!(
            audio.sink().log,
            vec!["start Normal 0.350", "stop", "start Slide 0.350"]
        );
        assert_eq!(audio.current_track(), Some(Track::Slide));
    }

    #[test]
    fn test_cue_volume_and_mute() {
        let settings = Settings {
            master_volume: 0.5,
            ..Settings::default()
        };
        let mut audio = AudioManager::new(Recorder::default(), &settings);
        audio.play_cue(Cue::Jump);
        audio.set_muted(true);
        assert!(audio.is_muted());
        audio.play_cue(Cue::Jump);
        assert_eq!(audio.sink().log, vec!["play Jump 0.350"]);
    }

    #[test]
    fn test_stop_without_track_is_quiet() {
        let mut audio = AudioManager::new(Recorder::default(), &Settings::default());
        audio.stop_track();
        assert!(audio.sink().log.is_empty());
    }

    #[test]
    fn test_routes_events() {
        let mut audio = AudioManager::new(Recorder::default(), &Settings::default());
        audio.handle_events(&[
            GameEvent::Jumped,
            GameEvent::Cue(Cue::Pickup),
            GameEvent::Track(Track::Slide),
        ]);
        assert_eq!(
            audio.sink().log,
            vec!["play Pickup 0.700", "start Slide 0.350"]
        );
    }
}
