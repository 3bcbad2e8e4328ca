use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Agent,
    Client,
    Prospect,
    Recruit,
    Partner,
    Family,
    Vendor,
    #[default]
    #[serde(other)]
    Other,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Agent,
        Role::Client,
        Role::Prospect,
        Role::Recruit,
        Role::Partner,
        Role::Family,
        Role::Vendor,
        Role::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Agent => "Agent",
            Self::Client => "Client",
            Self::Prospect => "Prospect",
            Self::Recruit => "Recruit",
            Self::Partner => "Partner",
            Self::Family => "Family",
            Self::Vendor => "Vendor",
            Self::Other => "Other",
        }
    }

    /// Single-character glyph drawn inside nodes at full detail so role is
    /// readable without relying on colour.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Agent => "A",
            Self::Client => "C",
            Self::Prospect => "P",
            Self::Recruit => "R",
            Self::Partner => "&",
            Self::Family => "F",
            Self::Vendor => "V",
            Self::Other => "?",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    Thriving,
    Steady,
    Cooling,
    AtRisk,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Health {
    pub fn label(self) -> &'static str {
        match self {
            Self::Thriving => "Thriving",
            Self::Steady => "Steady",
            Self::Cooling => "Cooling",
            Self::AtRisk => "At risk",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Business,
    Referral,
    RecruitingTree,
    CoAttendee,
    Communication,
    MentionedTogether,
    DeducedFamily,
    RoleRelationship,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 8] = [
        EdgeKind::Business,
        EdgeKind::Referral,
        EdgeKind::RecruitingTree,
        EdgeKind::CoAttendee,
        EdgeKind::Communication,
        EdgeKind::MentionedTogether,
        EdgeKind::DeducedFamily,
        EdgeKind::RoleRelationship,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Referral => "Referral",
            Self::RecruitingTree => "Recruiting tree",
            Self::CoAttendee => "Co-attendee",
            Self::Communication => "Communication",
            Self::MentionedTogether => "Mentioned together",
            Self::DeducedFamily => "Family (deduced)",
            Self::RoleRelationship => "Role relationship",
        }
    }

    pub fn is_family(self) -> bool {
        matches!(self, Self::DeducedFamily)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    Forward,
    Backward,
    Mutual,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub production: f32,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub health: Health,
    #[serde(default)]
    pub is_ghost: bool,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RelationshipRecord {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub confirmed: Option<bool>,
    #[serde(default)]
    pub direction: Option<EdgeDirection>,
}

fn default_confidence() -> f32 {
    1.0
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub self_id: Option<String>,
    #[serde(default)]
    pub people: Vec<PersonRecord>,
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
}
