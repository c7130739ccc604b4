use itertools::Itertools;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const ENTITY_TAG: &str = "hgm";
pub const ANIMATION_TAG: &str = "hga";
pub const ANIMATION_EXPORT_TAG: &str = "hgx";

/// The inherit-animation choice meaning "no inheritance".
pub const NO_INHERIT: &str = "None";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// A numeric field of a string that carries the entity tag is not a number.
    #[error("corrupt entity name [{name}]: {field} [{value}] is not an integer")]
    CorruptNumber {
        name: String,
        field: &'static str,
        value: String,
    },
}

/// The name an entity mesh object is exported under:
/// `hgm:<name>:<mesh>:<lod>:<lod_distance>[:s=<state>][:i=<inherit> mesh][:<comment>]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityName {
    pub name: String,
    pub mesh: String,
    pub lod: i64,
    pub lod_distance: i64,
    pub state: Option<String>,
    pub inherit: Option<String>,
    pub comment: Option<String>,
}

fn parse_number(full_name: &str, field: &'static str, value: &str) -> Result<i64, NameError> {
    value.parse().map_err(|_| NameError::CorruptNumber {
        name: full_name.to_owned(),
        field,
        value: value.to_owned(),
    })
}

/// Drops the two-character `s=` / `i=` marker from the front of a token.
fn marker_value(token: &str) -> String {
    token.chars().skip(2).collect()
}

impl EntityName {
    /// Parses an object name. Returns `Ok(None)` when the string is not an entity name at all,
    /// which is the common case as every object gets probed against it.
    pub fn parse(full_name: &str) -> Result<Option<EntityName>, NameError> {
        let tokens: Vec<&str> = full_name.split(':').collect();
        if tokens.len() < 5 || tokens[0] != ENTITY_TAG {
            return Ok(None);
        }

        let mut res = EntityName {
            name: tokens[1].to_owned(),
            mesh: tokens[2].to_owned(),
            lod: parse_number(full_name, "lod", tokens[3])?,
            lod_distance: parse_number(full_name, "lod distance", tokens[4])?,
            ..Default::default()
        };

        for token in &tokens[5..] {
            if token.contains("s=") {
                res.state = Some(marker_value(token));
            } else if token.contains("i=") {
                res.inherit = Some(marker_value(token));
            } else {
                // A free-text comment only survives while no state marker has been seen.
                res.comment = None;
                if !res.has_state() {
                    res.comment = Some(token.to_string());
                }
            }
        }

        Ok(Some(res))
    }

    fn has_state(&self) -> bool {
        self.state.as_deref().map_or(false, |s| !s.is_empty())
    }

    /// Key used to group the objects of one entity mesh in the export manifest.
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.name, self.mesh, self.lod)
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pieces = vec![
            ENTITY_TAG.to_owned(),
            self.name.clone(),
            self.mesh.clone(),
            self.lod.to_string(),
            self.lod_distance.to_string(),
        ];
        if let Some(state) = self.state.as_deref().filter(|s| !s.is_empty()) {
            pieces.push(format!("s={}", state));
        }
        if let Some(inherit) = self.inherit.as_deref().filter(|i| *i != NO_INHERIT) {
            pieces.push(format!("i={} mesh", inherit));
        }
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            pieces.push(comment.to_owned());
        }
        write!(f, "{}", pieces.iter().join(":"))
    }
}

/// An armature custom-property key naming one animated state: `hga:<entity>:<state>:<mesh>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimationName {
    pub entity: String,
    pub state: String,
    pub mesh: String,
}

impl AnimationName {
    pub fn new(entity: &str, state: &str, mesh: &str) -> Self {
        AnimationName {
            entity: entity.to_owned(),
            state: state.to_owned(),
            mesh: mesh.to_owned(),
        }
    }

    pub fn parse(full_name: &str) -> Option<AnimationName> {
        Self::parse_tagged(full_name, ANIMATION_TAG)
    }

    /// Parses the export marker form of the key (`hgx:...`).
    pub fn parse_export(full_name: &str) -> Option<AnimationName> {
        Self::parse_tagged(full_name, ANIMATION_EXPORT_TAG)
    }

    fn parse_tagged(full_name: &str, tag: &str) -> Option<AnimationName> {
        let tokens: Vec<&str> = full_name.split(':').collect();
        if tokens.len() < 4 || tokens[0] != tag {
            return None;
        }
        Some(AnimationName::new(tokens[1], tokens[2], tokens[3]))
    }

    /// The key of the marker property that enables exporting this animation.
    pub fn get_export_name(&self) -> String {
        self.to_string()
            .replacen(ANIMATION_TAG, ANIMATION_EXPORT_TAG, 1)
    }
}

impl fmt::Display for AnimationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            ANIMATION_TAG, self.entity, self.state, self.mesh
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootMotion {
    #[default]
    None,
    Cme,
    Vda,
    InverseCme,
}

impl RootMotion {
    pub fn as_str(self) -> &'static str {
        match self {
            RootMotion::None => "None",
            RootMotion::Cme => "CME",
            RootMotion::Vda => "VDA",
            RootMotion::InverseCme => "InverseCME",
        }
    }
}

impl FromStr for RootMotion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(RootMotion::None),
            "CME" => Ok(RootMotion::Cme),
            "VDA" => Ok(RootMotion::Vda),
            "InverseCME" => Ok(RootMotion::InverseCme),
            other => Err(anyhow::format_err!("Unknown root motion [{}]", other)),
        }
    }
}

/// The value stored under an animation key:
/// `root_motion:frame_start:frame_end:loop_anim:compensate_z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationProps {
    pub root_motion: RootMotion,
    pub frame_start: u32,
    pub frame_end: u32,
    pub loop_anim: bool,
    pub compensate_z: bool,
}

impl Default for AnimationProps {
    fn default() -> Self {
        AnimationProps {
            root_motion: RootMotion::None,
            frame_start: 1,
            frame_end: 2,
            loop_anim: false,
            compensate_z: true,
        }
    }
}

fn bool_token(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn parse_bool_token(token: &str) -> Option<bool> {
    match token {
        "True" => Some(true),
        "False" => Some(false),
        _ => None,
    }
}

impl AnimationProps {
    pub fn parse(value: &str) -> Option<AnimationProps> {
        let tokens: Vec<&str> = value.split(':').collect();
        if tokens.len() < 5 {
            return None;
        }
        Some(AnimationProps {
            root_motion: tokens[0].parse().ok()?,
            frame_start: tokens[1].parse().ok()?,
            frame_end: tokens[2].parse().ok()?,
            loop_anim: parse_bool_token(tokens[3])?,
            compensate_z: parse_bool_token(tokens[4])?,
        })
    }

    /// Reads whatever fields of a short or damaged value are readable and falls back to the
    /// defaults for the rest.
    pub fn parse_partial(value: &str) -> AnimationProps {
        let tokens: Vec<&str> = value.split(':').collect();
        let defaults = AnimationProps::default();
        let token = |i: usize| tokens.get(i).copied();
        AnimationProps {
            root_motion: token(0)
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.root_motion),
            frame_start: token(1)
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.frame_start),
            frame_end: token(2)
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.frame_end),
            loop_anim: token(3)
                .and_then(parse_bool_token)
                .unwrap_or(defaults.loop_anim),
            compensate_z: token(4)
                .and_then(parse_bool_token)
                .unwrap_or(defaults.compensate_z),
        }
    }
}

impl fmt::Display for AnimationProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.root_motion.as_str(),
            self.frame_start,
            self.frame_end,
            bool_token(self.loop_anim),
            bool_token(self.compensate_z)
        )
    }
}
