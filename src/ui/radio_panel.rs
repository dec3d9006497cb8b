//! Radio control panel in the top-right corner.

use bevy::prelude::*;

use super::{PANEL_BG, TEXT_COLOR};
use crate::audio::playlist::{BgmState, RadioPlaylist};
use crate::audio::RadioCommand;

pub struct RadioPanelPlugin;

impl Plugin for RadioPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_radio_panel).add_systems(
            Update,
            (
                handle_radio_buttons,
                update_button_styles,
                update_radio_labels,
            ),
        );
    }
}

#[derive(Component)]
struct RadioButton(RadioCommand);

#[derive(Component)]
struct PlayPauseLabel;

#[derive(Component)]
struct VolumeLabel;

#[derive(Component)]
struct BgmLabel;

// UI Colors
const BUTTON_IDLE: Color = Color::srgba(0.1, 0.12, 0.11, 0.95);
const BUTTON_HOVER: Color = Color::srgba(0.15, 0.18, 0.16, 0.95);
const BUTTON_PRESSED: Color = Color::srgba(0.2, 0.4, 0.3, 0.95);
const BORDER: Color = Color::srgb(0.0, 0.5, 0.3);

pub fn play_pause_label(radio: &RadioPlaylist) -> &'static str {
    if radio.is_playing() {
        "||"
    } else {
        ">"
    }
}

pub fn volume_label(radio: &RadioPlaylist) -> String {
    format!("Vol: {}%", radio.volume_percent())
}

fn setup_radio_panel(mut commands: Commands, radio: Res<RadioPlaylist>, bgm: Res<BgmState>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                right: Val::Px(10.0),
                padding: UiRect::all(Val::Px(8.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("RADIO"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));

            panel
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(6.0),
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|row| {
                    spawn_radio_button(row, "<<", RadioCommand::Previous, ());
                    spawn_radio_button(row, play_pause_label(&radio), RadioCommand::TogglePlay, PlayPauseLabel);
                    spawn_radio_button(row, ">>", RadioCommand::Next, ());
                });

            panel
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(6.0),
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|row| {
                    spawn_radio_button(row, "-", RadioCommand::VolumeDown, ());
                    row.spawn((
                        Text::new(volume_label(&radio)),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                        VolumeLabel,
                    ));
                    spawn_radio_button(row, "+", RadioCommand::VolumeUp, ());
                });

            spawn_radio_button(panel, bgm.button_label(), RadioCommand::ToggleBgm, BgmLabel);
        });
}

/// A bordered button; `label_marker` is attached to the text so it can be rewritten later.
fn spawn_radio_button(parent: &mut ChildBuilder, label: &str, command: RadioCommand, label_marker: impl Bundle) {
    parent
        .spawn((
            Button,
            Node {
                min_width: Val::Px(36.0),
                height: Val::Px(32.0),
                padding: UiRect::horizontal(Val::Px(8.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            BorderColor(BORDER),
            RadioButton(command),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                label_marker,
            ));
        });
}

fn handle_radio_buttons(
    interactions: Query<(&Interaction, &RadioButton), (Changed<Interaction>, With<Button>)>,
    mut radio_commands: EventWriter<RadioCommand>,
) {
    for (interaction, RadioButton(command)) in &interactions {
        if *interaction == Interaction::Pressed {
            radio_commands.send(*command);
        }
    }
}

fn update_button_styles(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<RadioButton>)>,
) {
    for (interaction, mut bg) in &mut buttons {
        bg.0 = match *interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVER,
            Interaction::None => BUTTON_IDLE,
        };
    }
}

fn update_radio_labels(
    radio: Res<RadioPlaylist>,
    bgm: Res<BgmState>,
    mut play_pause: Query<&mut Text, (With<PlayPauseLabel>, Without<VolumeLabel>, Without<BgmLabel>)>,
    mut volume: Query<&mut Text, (With<VolumeLabel>, Without<PlayPauseLabel>, Without<BgmLabel>)>,
    mut bgm_label: Query<&mut Text, (With<BgmLabel>, Without<PlayPauseLabel>, Without<VolumeLabel>)>,
) {
    if radio.is_changed() {
        for mut text in &mut play_pause {
            **text = play_pause_label(&radio).to_string();
        }
        for mut text in &mut volume {
            **text = volume_label(&radio);
        }
    }
    if bgm.is_changed() {
        for mut text in &mut bgm_label {
            **text = bgm.button_label().to_string();
        }
    }
}
