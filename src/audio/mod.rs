//! Car radio and background music.
//!
//! UI buttons send `RadioCommand`s; the playlist and BGM state live in
//! `playlist` and are mirrored into Bevy audio sinks here. Nothing in this
//! module reads or writes simulation state.

use bevy::{
    asset::LoadState,
    audio::{AudioSinkPlayback, Volume},
    prelude::*,
};

pub mod playlist;

use playlist::{BgmState, RadioPlaylist};

pub struct AudioPlugin;

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RadioConfig>()
            .init_resource::<RadioPlaylist>()
            .init_resource::<BgmState>()
            .add_event::<RadioCommand>()
            .add_systems(Startup, check_audio_config)
            .add_systems(
                Update,
                (
                    detect_first_interaction,
                    apply_radio_commands,
                    advance_finished_track,
                    sync_radio_speaker,
                    configure_loaded_speakers,
                    sync_bgm_speaker,
                    report_failed_tracks,
                )
                    .chain(),
            );
    }
}

/// Audio file locations and levels.
#[derive(Resource, Debug, Clone)]
pub struct RadioConfig {
    pub radio_tracks: Vec<String>,
    pub radio_volume: f32,
    pub volume_step: f32,
    pub bgm_track: String,
    pub bgm_volume: f32,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            radio_tracks: vec![
                "audio/radio_01.ogg".to_string(),
                "audio/radio_02.ogg".to_string(),
            ],
            radio_volume: 1.0,
            volume_step: 0.1,
            bgm_track: "audio/bgm.ogg".to_string(),
            bgm_volume: 0.3,
        }
    }
}

impl FromWorld for RadioPlaylist {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource_or_insert_with(RadioConfig::default);
        RadioPlaylist::new(config.radio_tracks.clone(), config.radio_volume)
    }
}

/// Requests from the radio panel.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioCommand {
    TogglePlay,
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
    ToggleBgm,
}

/// The entity playing the current radio track.
#[derive(Component)]
struct RadioSpeaker {
    generation: u64,
}

/// Volume and play state the current radio sink should have.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SinkSettings {
    volume: f32,
    playing: bool,
}

impl SinkSettings {
    /// `None` when the speaker belongs to a track the radio has moved past.
    fn for_speaker(speaker: &RadioSpeaker, radio: &RadioPlaylist) -> Option<Self> {
        (speaker.generation == radio.generation()).then(|| Self {
            volume: radio.volume(),
            playing: radio.is_playing(),
        })
    }

    fn apply(self, sink: &AudioSink) {
        sink.set_volume(self.volume);
        if self.playing {
            sink.play();
        } else {
            sink.pause();
        }
    }
}

/// The entity playing background music.
#[derive(Component)]
struct BgmSpeaker;

fn check_audio_config(config: Res<RadioConfig>) {
    if config.radio_tracks.is_empty() {
        warn!("No radio tracks configured; radio controls are disabled");
    } else {
        info!("Radio loaded with {} tracks", config.radio_tracks.len());
    }
}

/// Background music waits for the first key press or click.
fn detect_first_interaction(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut bgm: ResMut<BgmState>,
) {
    if keys.get_just_pressed().next().is_some() || mouse.get_just_pressed().next().is_some() {
        // Only the first interaction matters; don't flag every key press as a change.
        let was_requested = bgm.is_requested();
        bgm.bypass_change_detection().on_interaction();
        if !was_requested && bgm.is_requested() {
            bgm.set_changed();
        }
    }
}

fn apply_radio_commands(
    config: Res<RadioConfig>,
    mut commands_in: EventReader<RadioCommand>,
    mut radio: ResMut<RadioPlaylist>,
    mut bgm: ResMut<BgmState>,
) {
    for command in commands_in.read() {
        match command {
            RadioCommand::TogglePlay => {
                bgm.on_interaction();
                radio.toggle_play();
            }
            RadioCommand::Next => radio.next(),
            RadioCommand::Previous => radio.previous(),
            RadioCommand::VolumeUp => radio.volume_up(config.volume_step),
            RadioCommand::VolumeDown => radio.volume_down(config.volume_step),
            RadioCommand::ToggleBgm => {
                bgm.toggle_mute();
                info!("Background music muted: {}", bgm.is_muted());
            }
        }
        debug!("Radio command {:?}", command);
    }
}

/// Move on to the next track when the current one runs out.
fn advance_finished_track(
    mut radio: ResMut<RadioPlaylist>,
    speakers: Query<(&RadioSpeaker, &AudioSink)>,
) {
    if !radio.is_playing() {
        return;
    }
    let finished = speakers
        .iter()
        .any(|(speaker, sink)| speaker.generation == radio.generation() && sink.empty());
    if finished {
        radio.next();
        info!("Radio advanced to track {}", radio.current_index() + 1);
    }
}

fn sync_radio_speaker(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    radio: Res<RadioPlaylist>,
    speakers: Query<(Entity, &RadioSpeaker, Option<&AudioSink>)>,
) {
    if !radio.is_changed() {
        return;
    }

    let mut current = None;
    for (entity, speaker, sink) in &speakers {
        match SinkSettings::for_speaker(speaker, &radio) {
            Some(settings) => current = Some((settings, sink)),
            None => commands.entity(entity).despawn(),
        }
    }

    match current {
        Some((settings, Some(sink))) => settings.apply(sink),
        // Still loading: `configure_loaded_speakers` catches up once the sink exists.
        Some((_, None)) => {}
        None if radio.is_playing() => {
            let Some(track) = radio.current_track() else {
                return;
            };
            commands.spawn((
                AudioPlayer::new(asset_server.load(track.to_string())),
                PlaybackSettings::ONCE.with_volume(Volume::new(radio.volume())),
                RadioSpeaker {
                    generation: radio.generation(),
                },
            ));
            info!("Radio playing {}", track);
        }
        None => {}
    }
}

/// A sink created after the player paused or changed volume must not keep its spawn settings.
fn configure_loaded_speakers(
    radio: Res<RadioPlaylist>,
    speakers: Query<(&RadioSpeaker, &AudioSink), Added<AudioSink>>,
) {
    for (speaker, sink) in &speakers {
        if let Some(settings) = SinkSettings::for_speaker(speaker, &radio) {
            settings.apply(sink);
        }
    }
}

fn sync_bgm_speaker(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<RadioConfig>,
    bgm: Res<BgmState>,
    speakers: Query<Option<&AudioSink>, With<BgmSpeaker>>,
) {
    if !bgm.is_changed() || !bgm.is_requested() {
        return;
    }

    let volume = bgm.output_volume(config.bgm_volume);
    if speakers.is_empty() {
        commands.spawn((
            AudioPlayer::new(asset_server.load(config.bgm_track.clone())),
            PlaybackSettings::LOOP.with_volume(Volume::new(volume)),
            BgmSpeaker,
        ));
        info!("Background music started");
        return;
    }

    for sink in speakers.iter().flatten() {
        sink.set_volume(volume);
        sink.play();
    }
}

/// A track that fails to load is logged and skipped over; the simulation never sees it.
fn report_failed_tracks(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut radio: ResMut<RadioPlaylist>,
    speakers: Query<(Entity, &AudioPlayer, Option<&RadioSpeaker>)>,
) {
    for (entity, player, radio_speaker) in &speakers {
        if !matches!(asset_server.load_state(player.0.id()), LoadState::Failed(_)) {
            continue;
        }
        let path = player
            .0
            .path()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "<unnamed>".to_string());
        warn!("Audio playback failed for {}", path);
        commands.entity(entity).despawn();

        if radio_speaker.is_some_and(|s| s.generation == radio.generation()) && radio.is_playing() {
            radio.toggle_play();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radio() -> RadioPlaylist {
        RadioPlaylist::new(vec!["a.ogg".into(), "b.ogg".into()], 1.0)
    }

    #[test]
    fn loading_speaker_picks_up_changes_made_while_it_loaded() {
        let mut radio = radio();
        radio.toggle_play();
        let speaker = RadioSpeaker {
            generation: radio.generation(),
        };

        // Paused and turned down before the sink existed.
        radio.toggle_play();
        radio.volume_down(0.1);

        let settings = SinkSettings::for_speaker(&speaker, &radio);
        assert_eq!(
            settings,
            Some(SinkSettings {
                volume: 0.9,
                playing: false,
            })
        );
    }

    #[test]
    fn stale_speaker_gets_no_settings() {
        let mut radio = radio();
        radio.toggle_play();
        let speaker = RadioSpeaker {
            generation: radio.generation(),
        };

        radio.next();
        assert_eq!(SinkSettings::for_speaker(&speaker, &radio), None);
    }
}
