//! Enemy formation hierarchy
//!
//! Enemies and groups live in two arenas addressed by stable ids. A group
//! holds an insertion-ordered list of child components (enemies or other
//! groups). Nothing is ever freed from the arenas: deactivation flips a
//! flag, and `cleanup_inactive` only detaches ids from a group's child list.
//! This keeps ids valid across a whole tick, so the collision pass can mark
//! enemies dead without disturbing the lists it is walking.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Index of an enemy in the formation arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub usize);

/// Index of a group in the formation arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub usize);

/// A node in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Enemy(EnemyId),
    Group(GroupId),
}

/// A single alien
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: IVec2,
    pub active: bool,
    /// Grid slot at construction time
    pub row: u32,
    pub col: u32,
}

/// A group of components moving as a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub children: Vec<Component>,
    pub active: bool,
    /// +1 = right, -1 = left
    pub direction: i32,
    /// Horizontal pixels per tick
    pub speed: i32,
}

/// Horizontal limits and drop step shared by every group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub drop_step: i32,
}

/// What a group did during one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Inactive, or nothing to move
    Idle,
    Moved,
    /// Hit a margin: dropped one row and reversed
    Dropped,
}

/// Arena-backed composite of enemies and groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    enemies: Vec<Enemy>,
    groups: Vec<Group>,
    bounds: FormationBounds,
}

impl Formation {
    pub fn new(bounds: FormationBounds) -> Self {
        Self {
            enemies: Vec::new(),
            groups: Vec::new(),
            bounds,
        }
    }

    pub fn bounds(&self) -> FormationBounds {
        self.bounds
    }

    /// Allocate a detached enemy
    pub fn spawn_enemy(&mut self, pos: IVec2, row: u32, col: u32) -> EnemyId {
        self.enemies.push(Enemy {
            pos,
            active: true,
            row,
            col,
        });
        EnemyId(self.enemies.len() - 1)
    }

    /// Allocate a detached, stationary group
    pub fn spawn_group(&mut self, name: impl Into<String>) -> GroupId {
        let name = name.into();
        log::debug!("Group created: {}", name);
        self.groups.push(Group {
            name,
            children: Vec::new(),
            active: true,
            direction: 1,
            speed: 0,
        });
        GroupId(self.groups.len() - 1)
    }

    /// Build a rows x cols grid of enemies under a new detached group
    pub fn spawn_rectangular(
        &mut self,
        name: impl Into<String>,
        rows: i32,
        cols: i32,
        origin: IVec2,
        spacing: i32,
        speed: i32,
    ) -> GroupId {
        let group = self.spawn_group(name);
        self.groups[group.0].speed = speed;
        for row in 0..rows.max(0) {
            for col in 0..cols.max(0) {
                let pos = origin + IVec2::new(col * spacing, row * spacing);
                let enemy = self.spawn_enemy(pos, row as u32, col as u32);
                self.groups[group.0].children.push(Component::Enemy(enemy));
            }
        }
        log::info!(
            "Rectangular formation created: {}x{} = {} aliens",
            rows.max(0),
            cols.max(0),
            self.groups[group.0].children.len()
        );
        group
    }

    pub fn enemy(&self, id: EnemyId) -> &Enemy {
        &self.enemies[id.0]
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> &mut Enemy {
        &mut self.enemies[id.0]
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    pub fn group_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.0]
    }

    /// Attach a component to a group.
    ///
    /// Returns false when it is already a child, or when attaching would
    /// put a group inside its own subtree.
    pub fn add(&mut self, group: GroupId, component: Component) -> bool {
        if self.groups[group.0].children.contains(&component) {
            return false;
        }
        if let Component::Group(child) = component {
            if child == group || self.subtree_contains(child, group) {
                log::warn!(
                    "Refusing to nest {} inside its own subtree",
                    self.groups[child.0].name
                );
                return false;
            }
        }
        let g = &mut self.groups[group.0];
        g.children.push(component);
        log::debug!("Component added to {} - Total: {}", g.name, g.children.len());
        true
    }

    /// Detach a component from a group; no-op when absent
    pub fn remove(&mut self, group: GroupId, component: Component) -> bool {
        let g = &mut self.groups[group.0];
        let Some(idx) = g.children.iter().position(|c| *c == component) else {
            return false;
        };
        g.children.remove(idx);
        log::debug!("Component removed from {} - Remaining: {}", g.name, g.children.len());
        true
    }

    pub fn is_active(&self, component: Component) -> bool {
        match component {
            Component::Enemy(id) => self.enemies[id.0].active,
            Component::Group(id) => self.groups[id.0].active,
        }
    }

    /// Set the flag on a component and, for groups, every descendant
    pub fn set_active(&mut self, component: Component, active: bool) {
        match component {
            Component::Enemy(id) => self.enemies[id.0].active = active,
            Component::Group(id) => {
                self.groups[id.0].active = active;
                let children = self.groups[id.0].children.clone();
                for child in children {
                    self.set_active(child, active);
                }
                log::debug!(
                    "{} set to {}",
                    self.groups[id.0].name,
                    if active { "active" } else { "inactive" }
                );
            }
        }
    }

    /// Mark an enemy as destroyed
    pub fn hit(&mut self, enemy: EnemyId) {
        self.enemies[enemy.0].active = false;
    }

    /// Active components in the subtree; an active group counts itself
    /// plus its active descendants.
    pub fn count_active_components(&self, group: GroupId) -> usize {
        self.groups[group.0]
            .children
            .iter()
            .filter(|c| self.is_active(**c))
            .map(|c| match c {
                Component::Enemy(_) => 1,
                Component::Group(g) => 1 + self.count_active_components(*g),
            })
            .sum()
    }

    /// Detach inactive direct children. Does not recurse.
    pub fn cleanup_inactive(&mut self, group: GroupId) -> usize {
        let before = self.groups[group.0].children.len();
        let children = std::mem::take(&mut self.groups[group.0].children);
        let kept: Vec<Component> = children
            .into_iter()
            .filter(|c| self.is_active(*c))
            .collect();
        let g = &mut self.groups[group.0];
        g.children = kept;
        let removed = before - g.children.len();
        if removed > 0 {
            log::debug!("{} cleaned up: {} inactive components removed", g.name, removed);
        }
        removed
    }

    /// The group and every group below it, parents first
    pub fn groups_under(&self, group: GroupId) -> Vec<GroupId> {
        let mut out = vec![group];
        let mut i = 0;
        while i < out.len() {
            for child in &self.groups[out[i].0].children {
                if let Component::Group(g) = child {
                    out.push(*g);
                }
            }
            i += 1;
        }
        out
    }

    /// Active enemies reachable through active groups
    pub fn active_leaves(&self, group: GroupId) -> Vec<EnemyId> {
        let mut out = Vec::new();
        self.collect_active_leaves(group, &mut out);
        out
    }

    fn collect_active_leaves(&self, group: GroupId, out: &mut Vec<EnemyId>) {
        let g = &self.groups[group.0];
        if !g.active {
            return;
        }
        for child in &g.children {
            match *child {
                Component::Enemy(id) if self.enemies[id.0].active => out.push(id),
                Component::Group(sub) => self.collect_active_leaves(sub, out),
                _ => {}
            }
        }
    }

    fn subtree_contains(&self, root: GroupId, needle: GroupId) -> bool {
        self.groups_under(root).contains(&needle)
    }

    fn direct_active_enemies(&self, group: GroupId) -> Vec<EnemyId> {
        self.groups[group.0]
            .children
            .iter()
            .filter_map(|c| match *c {
                Component::Enemy(id) if self.enemies[id.0].active => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Advance a group by one tick, then its active subgroups.
    ///
    /// A group moves its direct active enemies sideways. If the next step
    /// would carry the leading enemy past a margin, the group instead drops
    /// one row and reverses for the following tick. Returns the groups that
    /// dropped this tick.
    pub fn update(&mut self, group: GroupId) -> Vec<GroupId> {
        let mut dropped = Vec::new();
        self.update_into(group, &mut dropped);
        dropped
    }

    fn update_into(&mut self, group: GroupId, dropped: &mut Vec<GroupId>) {
        if !self.groups[group.0].active {
            return;
        }
        if self.step_group(group) == Step::Dropped {
            dropped.push(group);
        }
        let subgroups: Vec<GroupId> = self.groups[group.0]
            .children
            .iter()
            .filter_map(|c| match *c {
                Component::Group(g) if self.groups[g.0].active => Some(g),
                _ => None,
            })
            .collect();
        for sub in subgroups {
            self.update_into(sub, dropped);
        }
    }

    fn step_group(&mut self, group: GroupId) -> Step {
        let members = self.direct_active_enemies(group);
        let (Some(leftmost), Some(rightmost)) = (
            members.iter().map(|id| self.enemies[id.0].pos.x).min(),
            members.iter().map(|id| self.enemies[id.0].pos.x).max(),
        ) else {
            return Step::Idle;
        };

        let g = &self.groups[group.0];
        let (direction, speed) = (g.direction, g.speed);
        let at_edge = (direction > 0 && rightmost + speed > self.bounds.max_x)
            || (direction < 0 && leftmost - speed < self.bounds.min_x);

        let delta = if at_edge {
            IVec2::new(0, self.bounds.drop_step)
        } else {
            IVec2::new(direction * speed, 0)
        };
        for id in &members {
            self.enemies[id.0].pos += delta;
        }

        if at_edge {
            self.groups[group.0].direction = -direction;
            log::debug!("{} moving down", self.groups[group.0].name);
            Step::Dropped
        } else {
            Step::Moved
        }
    }
}
