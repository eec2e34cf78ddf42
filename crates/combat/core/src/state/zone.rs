use super::{EntityId, TileGrid, ZoneId};
use crate::error::InvariantViolation;
use crate::fixed::FixedVec2;

/// Combat-relevant view of one entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityState {
    pub id: EntityId,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    pub position: FixedVec2,
}

impl EntityState {
    /// Creates a living entity at full health.
    pub fn new(id: EntityId, max_health: i32, position: FixedVec2) -> Self {
        let max_health = max_health.max(0);
        Self {
            id,
            health: max_health,
            max_health,
            alive: max_health > 0,
            position,
        }
    }

    #[must_use]
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health.max(0).min(self.max_health);
        self.alive = self.health > 0;
        self
    }

    /// Returns the entity after taking `damage` (negative treated as zero) and
    /// whether this hit killed it.
    pub fn damaged(&self, damage: i32) -> (Self, bool) {
        let damage = damage.max(0);
        let health = self.health.saturating_sub(damage).max(0);
        let killed = self.alive && health == 0;
        let next = Self {
            health,
            alive: self.alive && health > 0,
            ..self.clone()
        };
        (next, killed)
    }
}

/// Immutable snapshot of one zone: entities ordered by id plus collision tiles.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ZoneParts"))]
pub struct ZoneState {
    pub id: ZoneId,
    entities: Vec<EntityState>,
    pub tiles: TileGrid,
}

/// Deserialized zone before its entities are put in id order.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ZoneParts {
    id: ZoneId,
    entities: Vec<EntityState>,
    tiles: TileGrid,
}

#[cfg(feature = "serde")]
impl From<ZoneParts> for ZoneState {
    fn from(parts: ZoneParts) -> Self {
        Self::new(parts.id, parts.entities, parts.tiles)
    }
}

impl ZoneState {
    /// Builds a zone snapshot, sorting entities by id.
    pub fn new(id: ZoneId, mut entities: Vec<EntityState>, tiles: TileGrid) -> Self {
        entities.sort_by_key(|entity| entity.id);
        Self {
            id,
            entities,
            tiles,
        }
    }

    pub fn entities(&self) -> &[EntityState] {
        &self.entities
    }

    pub fn entity_index(&self, id: EntityId) -> Option<usize> {
        self.entities
            .binary_search_by_key(&id, |entity| entity.id)
            .ok()
    }

    pub fn entity(&self, id: EntityId) -> Option<&EntityState> {
        self.entity_index(id).map(|index| &self.entities[index])
    }

    /// Returns the zone with `entity` replacing the entry of the same id, or
    /// inserted at its sorted position when no such entry exists.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityState) -> Self {
        match self
            .entities
            .binary_search_by_key(&entity.id, |existing| existing.id)
        {
            Ok(index) => self.entities[index] = entity,
            Err(index) => self.entities.insert(index, entity),
        }
        self
    }

    /// Checks ordering and health invariants of every entity.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for (index, pair) in self.entities.windows(2).enumerate() {
            if pair[0].id >= pair[1].id {
                return Err(InvariantViolation::EntityOrder {
                    index: index + 1,
                    entity: pair[1].id,
                });
            }
        }
        for entity in &self.entities {
            let in_range = (0..=entity.max_health).contains(&entity.health);
            if !in_range || (entity.alive && entity.health == 0) {
                return Err(InvariantViolation::EntityHealth {
                    entity: entity.id,
                    health: entity.health,
                    max_health: entity.max_health,
                });
            }
        }
        Ok(())
    }
}
