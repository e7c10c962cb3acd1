use serde::Serialize;

/// Icon and colour classes used to display an activity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityIcon {
    pub icon_path: &'static str,
    pub bg_color: &'static str,
    pub icon_color: &'static str,
}

const fn icon(icon_path: &'static str, bg_color: &'static str, icon_color: &'static str) -> ActivityIcon {
    ActivityIcon { icon_path, bg_color, icon_color }
}

/// Icon for activities with no keyword match
pub const DEFAULT_ICON: ActivityIcon = icon("/icons/card.svg", "bg-slate-100", "text-slate-600");

/// Lowercase keyword table, checked in order during fuzzy matching
static ACTIVITY_ICONS: &[(&str, ActivityIcon)] = &[
    ("archery", icon("/icons/archery.svg", "bg-orange-100", "text-orange-600")),
    ("athletics", icon("/icons/athletics.svg", "bg-red-100", "text-red-600")),
    ("badminton", icon("/icons/badminton.svg", "bg-yellow-100", "text-yellow-600")),
    ("basketball", icon("/icons/basketball.svg", "bg-orange-100", "text-orange-600")),
    ("boccia", icon("/icons/boccia.svg", "bg-indigo-100", "text-indigo-600")),
    ("boxing", icon("/icons/boxing.svg", "bg-red-100", "text-red-600")),
    ("capoeira", icon("/icons/fighting.svg", "bg-orange-100", "text-orange-600")),
    ("chess", icon("/icons/chess.svg", "bg-slate-100", "text-slate-600")),
    ("croquet", icon("/icons/mallet.svg", "bg-green-100", "text-green-600")),
    ("curling", icon("/icons/curling.svg", "bg-blue-100", "text-blue-600")),
    ("dragon boat", icon("/icons/row.svg", "bg-cyan-100", "text-cyan-600")),
    ("first aid", icon("/icons/first-aid.svg", "bg-red-100", "text-red-600")),
    ("fitness", icon("/icons/fitness.svg", "bg-red-100", "text-red-600")),
    ("food safe", icon("/icons/food.svg", "bg-green-100", "text-green-600")),
    ("gymnastics", icon("/icons/gymnastics.svg", "bg-purple-100", "text-purple-600")),
    ("hockey", icon("/icons/hockey.svg", "bg-blue-100", "text-blue-600")),
    ("lawn bowling", icon("/icons/bowling.svg", "bg-emerald-100", "text-emerald-600")),
    ("multisport", icon("/icons/athletics.svg", "bg-yellow-100", "text-yellow-600")),
    ("netball", icon("/icons/netball.svg", "bg-pink-100", "text-pink-600")),
    ("open gym", icon("/icons/open-gym.svg", "bg-slate-100", "text-slate-600")),
    ("pickleball", icon("/icons/pickleball.svg", "bg-teal-100", "text-teal-600")),
    ("rhythmic gymnastics", icon("/icons/gymnastics.svg", "bg-purple-100", "text-purple-600")),
    ("soccer", icon("/icons/soccer.svg", "bg-emerald-100", "text-emerald-600")),
    ("status card clinic", icon("/icons/card.svg", "bg-blue-100", "text-blue-600")),
    ("table tennis", icon("/icons/table-tennis.svg", "bg-green-100", "text-green-600")),
    ("tennis", icon("/icons/tennis.svg", "bg-green-100", "text-green-600")),
    ("volleyball", icon("/icons/volleyball.svg", "bg-blue-100", "text-blue-600")),
    ("yoga", icon("/icons/yoga.svg", "bg-purple-100", "text-purple-600")),
    ("youth dragon boat team", icon("/icons/row.svg", "bg-cyan-100", "text-cyan-600")),
];

/// Look up the icon for an activity name
///
/// Exact keyword match first, then the first keyword that contains or is
/// contained in the name.
pub fn activity_icon(activity_name: &str) -> &'static ActivityIcon {
    let normalized = activity_name.trim().to_lowercase();
    if normalized.is_empty() {
        return &DEFAULT_ICON;
    }

    if let Some((_, icon)) = ACTIVITY_ICONS.iter().find(|(keyword, _)| *keyword == normalized) {
        return icon;
    }

    ACTIVITY_ICONS
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword) || keyword.contains(normalized.as_str()))
        .map(|(_, icon)| icon)
        .unwrap_or(&DEFAULT_ICON)
}
