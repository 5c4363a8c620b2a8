//! Shared UI building blocks for menus and the HUD.

use bevy::prelude::*;

pub const BUTTON_SIZE: Vec2 = Vec2::new(165.0, 68.0);

pub const BUTTON_IDLE: Color = Color::srgb(0.93, 0.80, 0.45);
pub const BUTTON_HOVERED: Color = Color::srgb(0.98, 0.88, 0.58);
pub const BUTTON_PRESSED: Color = Color::srgb(0.80, 0.66, 0.33);

pub const MENU_BACKGROUND: Color = Color::srgb(0.16, 0.20, 0.30);
pub const TRANSLUCENT_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.6);

pub fn plugin(app: &mut App) {
    app.add_systems(Update, button_feedback);
}

/// White centred text for titles and messages.
pub fn header(text: impl Into<String>, font_size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont { font_size, ..default() },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(Justify::Center),
    )
}

/// A button node without a label. Attach the label with [`button_label`].
pub fn button_node(size: Vec2) -> impl Bundle {
    (
        Button,
        Node {
            width: Val::Px(size.x),
            height: Val::Px(size.y),
            margin: UiRect::all(Val::Px(8.0)),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(BUTTON_IDLE),
    )
}

pub fn button_label(text: impl Into<String>, font_size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont { font_size, ..default() },
        TextColor(Color::BLACK),
        TextLayout::new_with_justify(Justify::Center),
    )
}

/// Standard menu button: `action` is whatever the owning screen reacts to.
pub fn button(text: impl Into<String>, action: impl Component) -> impl Bundle {
    (button_node(BUTTON_SIZE), action, children![button_label(text, 24.0)])
}

/// Full-screen column with everything centred.
pub fn screen_root() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        position_type: PositionType::Absolute,
        flex_direction: FlexDirection::Column,
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        row_gap: Val::Px(12.0),
        ..default()
    }
}

fn button_feedback(
    mut q_buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
) {
    for (interaction, mut color) in &mut q_buttons {
        color.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVERED,
            Interaction::None => BUTTON_IDLE,
        };
    }
}
