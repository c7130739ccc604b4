use std::fmt;

use crate::scene::{ObjectId, ObjectKind, Scene, SceneObject};

/// What an object is exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Root of an entity: a parentless empty or armature.
    Origin,
    Mesh,
    /// Secondary mesh parented to an entity mesh.
    Surface,
    /// Attachment point on a mesh or bone. Curves become spot paths.
    Spot,
    /// Armature parented to another object.
    Armature,
    Ignored,
    /// Not exported.
    Unclassified,
    /// Object type the exporter knows nothing about. Diagnostic only.
    Unsupported(ObjectKind),
}

impl Role {
    pub fn tag(self) -> &'static str {
        match self {
            Role::Origin => "ORIGIN",
            Role::Mesh => "MESH",
            Role::Surface => "SURFACE",
            Role::Spot => "SPOT",
            Role::Armature => "ARMATURE",
            Role::Ignored => "IGNORED",
            Role::Unclassified => "NONE",
            Role::Unsupported(kind) => kind.tag(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Decides the role of one object from its own fields and the role of its direct parent
/// (`None` when it has no parent). Ancestors further up are never consulted.
pub fn classify(object: &SceneObject, parent_role: Option<Role>) -> Role {
    if object.settings.ignore {
        return Role::Ignored;
    }

    let parent_is = |role: Role| parent_role == Some(role);
    let attached = parent_is(Role::Mesh) || object.has_parent_bone();

    match object.kind {
        ObjectKind::Empty => match parent_role {
            None => Role::Origin,
            Some(_) if attached => Role::Spot,
            Some(_) => Role::Unclassified,
        },
        ObjectKind::Curve => {
            if attached {
                Role::Spot
            } else {
                Role::Unclassified
            }
        }
        ObjectKind::Armature => match parent_role {
            None => Role::Origin,
            Some(_) => Role::Armature,
        },
        ObjectKind::Mesh => {
            if parent_is(Role::Mesh) {
                Role::Surface
            } else if parent_is(Role::Origin) || parent_is(Role::Armature) {
                Role::Mesh
            } else {
                Role::Unclassified
            }
        }
        ObjectKind::Other => {
            log::debug!(
                "Didn't resolve a role for [{}] of type {}",
                object.name,
                object.kind
            );
            Role::Unsupported(object.kind)
        }
    }
}

/// Resolves the role of a single object, walking up its parent chain.
pub fn resolve_role(scene: &Scene, id: ObjectId) -> Role {
    let mut chain = vec![id];
    let mut current = id;
    while let Some(parent) = scene.parent(current) {
        if chain.len() > scene.len() {
            break;
        }
        chain.push(parent);
        current = parent;
    }

    let mut role = None;
    for id in chain.into_iter().rev() {
        role = Some(classify(scene.get(id), role));
    }
    role.unwrap_or(Role::Unclassified)
}

/// Roles of every object of a scene, computed once for one validation pass. Build a new map
/// whenever the scene changes.
#[derive(Debug, Clone)]
pub struct RoleMap {
    roles: Vec<Role>,
}

impl RoleMap {
    pub fn resolve(scene: &Scene) -> RoleMap {
        let mut memo: Vec<Option<Role>> = vec![None; scene.len()];

        for id in scene.ids() {
            // Walk up to the first ancestor with a known role, then resolve back down.
            let mut pending = vec![];
            let mut current = Some(id);
            while let Some(c) = current {
                if memo[c.index()].is_some() || pending.len() > scene.len() {
                    break;
                }
                pending.push(c);
                current = scene.parent(c);
            }

            for p in pending.into_iter().rev() {
                let parent_role = scene.parent(p).and_then(|parent| memo[parent.index()]);
                memo[p.index()] = Some(classify(scene.get(p), parent_role));
            }
        }

        RoleMap {
            roles: memo
                .into_iter()
                .map(|r| r.unwrap_or(Role::Unclassified))
                .collect(),
        }
    }

    pub fn role(&self, id: ObjectId) -> Role {
        self.roles[id.index()]
    }

    /// Returns the direct parent of `id` if it has the given role.
    pub fn parent_with_role(&self, scene: &Scene, id: ObjectId, role: Role) -> Option<ObjectId> {
        scene.parent(id).filter(|parent| self.role(*parent) == role)
    }
}
