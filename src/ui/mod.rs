//! HUD: hit counter, control hints and the radio panel.

use bevy::prelude::*;

use crate::game_state::HitCounter;

pub mod radio_panel;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(radio_panel::RadioPanelPlugin)
            .add_systems(Startup, setup_hud)
            .add_systems(Update, update_hit_counter);
    }
}

// Colors
pub(crate) const PANEL_BG: Color = Color::srgba(0.05, 0.07, 0.06, 0.85);
pub(crate) const TEXT_COLOR: Color = Color::srgb(0.95, 0.95, 0.9);
const HIT_COLOR: Color = Color::srgb(1.0, 0.75, 0.2);

/// Marker for the hit counter text.
#[derive(Component)]
struct HitCounterText;

pub fn hit_counter_label(hits: &HitCounter) -> String {
    format!("Hits: {}", hits.get())
}

fn setup_hud(mut commands: Commands, hits: Res<HitCounter>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(PANEL_BG),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(hit_counter_label(&hits)),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(HIT_COLOR),
                HitCounterText,
            ));
        });

    commands.spawn((
        Text::new("WASD / Arrows: Drive"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.85, 0.9, 0.85)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));
}

fn update_hit_counter(hits: Res<HitCounter>, mut query: Query<&mut Text, With<HitCounterText>>) {
    if !hits.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = hit_counter_label(&hits);
    }
}
