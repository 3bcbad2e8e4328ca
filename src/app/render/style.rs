use eframe::egui::{Color32, Stroke};

use crate::dataset::{EdgeKind, Health, Role};

pub(in crate::app) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub(in crate::app) const SELECTED: Color32 = Color32::from_rgb(245, 206, 93);
pub(in crate::app) const SEARCH_HIT: Color32 = Color32::from_rgb(103, 196, 255);
pub(in crate::app) const HOVER: Color32 = Color32::from_rgb(255, 164, 101);
pub(in crate::app) const LABEL: Color32 = Color32::from_gray(238);

pub(in crate::app) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount).round() as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(in crate::app) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, (a as f32 * opacity).round() as u8)
}

pub(in crate::app) fn role_color(role: Role) -> Color32 {
    match role {
        Role::Agent => Color32::from_rgb(241, 146, 94),
        Role::Client => Color32::from_rgb(86, 170, 226),
        Role::Prospect => Color32::from_rgb(150, 128, 232),
        Role::Recruit => Color32::from_rgb(102, 201, 140),
        Role::Partner => Color32::from_rgb(232, 196, 88),
        Role::Family => Color32::from_rgb(229, 120, 170),
        Role::Vendor => Color32::from_rgb(140, 160, 172),
        Role::Other => Color32::from_rgb(120, 126, 136),
    }
}

pub(in crate::app) fn health_stroke(health: Health) -> Stroke {
    match health {
        Health::Thriving => Stroke::new(2.6, Color32::from_rgb(96, 214, 128)),
        Health::Steady => Stroke::new(1.6, Color32::from_rgb(176, 196, 210)),
        Health::Cooling => Stroke::new(1.8, Color32::from_rgb(236, 186, 84)),
        Health::AtRisk => Stroke::new(2.8, Color32::from_rgb(232, 92, 86)),
        Health::Unknown => Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
    }
}

pub(in crate::app) fn edge_color(kind: EdgeKind) -> Color32 {
    match kind {
        EdgeKind::Business => Color32::from_rgb(112, 150, 190),
        EdgeKind::Referral => Color32::from_rgb(128, 196, 150),
        EdgeKind::RecruitingTree => Color32::from_rgb(200, 160, 96),
        EdgeKind::CoAttendee => Color32::from_rgb(150, 140, 200),
        EdgeKind::Communication => Color32::from_rgb(110, 118, 130),
        EdgeKind::MentionedTogether => Color32::from_rgb(140, 140, 140),
        EdgeKind::DeducedFamily => Color32::from_rgb(229, 120, 170),
        EdgeKind::RoleRelationship => Color32::from_rgb(96, 180, 196),
    }
}

/// Opacity and radius multiplier for a node `hop` steps from the
/// selection. Without a selection everything is drawn at full strength.
pub(in crate::app) fn focus_context(hop: u8, has_selection: bool) -> (f32, f32) {
    if !has_selection {
        return (1.0, 1.0);
    }
    match hop {
        0 => (1.0, 1.15),
        1 => (0.9, 1.0),
        2 => (0.55, 0.95),
        _ => (0.22, 0.9),
    }
}
