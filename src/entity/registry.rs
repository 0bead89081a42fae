//! Monster Registry - arena-backed doubly linked list
//!
//! Monsters live in a slot arena and are addressed by generational `Handle`s.
//! Each occupied slot carries explicit `prev`/`next` handles, so removal from
//! the middle of the sequence is O(1) and a removed monster's handle simply
//! stops resolving instead of dangling.
//!
//! Traversal that may remove the current node must capture `next_of` before
//! calling `remove`, which is what the simulation step does.

use crate::core::error::{PenError, Result};
use crate::core::types::{Millis, MonsterId, Species, WRITABLE_WIDTH};
use crate::entity::monster::Monster;

/// Stable reference to a registry slot
///
/// The generation is bumped when the slot is vacated, which invalidates every
/// handle that was issued for the previous occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Node {
    monster: Monster,
    prev: Option<Handle>,
    next: Option<Handle>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The pen's population in arrival order
#[derive(Debug, Clone, Default)]
pub struct MonsterRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    head: Option<Handle>,
    tail: Option<Handle>,
    len: usize,
    next_id: u32,
}

impl MonsterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> Option<Handle> {
        self.head
    }

    pub fn tail(&self) -> Option<Handle> {
        self.tail
    }

    /// Id that the next `spawn` will assign
    pub fn peek_next_id(&self) -> MonsterId {
        MonsterId(self.next_id)
    }

    fn node(&self, handle: Handle) -> Option<&Node> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, handle: Handle) -> Option<&mut Node> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Follow a link stored in another node. A link to a vacant slot means the
    /// list is corrupt, which is a logic error.
    fn linked_mut(&mut self, handle: Handle) -> &mut Node {
        match self.node_mut(handle) {
            Some(node) => node,
            None => panic!("registry link {:?} points at a vacant slot", handle),
        }
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.node(handle).is_some()
    }

    pub fn get(&self, handle: Handle) -> Option<&Monster> {
        self.node(handle).map(|node| &node.monster)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Monster> {
        self.node_mut(handle).map(|node| &mut node.monster)
    }

    pub fn next_of(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).and_then(|node| node.next)
    }

    pub fn prev_of(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).and_then(|node| node.prev)
    }

    pub fn find(&self, id: MonsterId) -> Option<Handle> {
        self.iter()
            .find(|(_, monster)| monster.id == id)
            .map(|(handle, _)| handle)
    }

    /// Append a monster at the tail
    ///
    /// Fails with `InvalidState` if the monster's position is off the strip.
    pub fn insert(&mut self, monster: Monster) -> Result<Handle> {
        if monster.position as usize >= WRITABLE_WIDTH {
            return Err(PenError::InvalidState(format!(
                "monster {} position {} is outside 0..{}",
                monster.id, monster.position, WRITABLE_WIDTH
            )));
        }
        if monster.speed == 0 {
            return Err(PenError::InvalidState(format!(
                "monster {} has zero speed",
                monster.id
            )));
        }

        // Keep id allocation ahead of explicitly numbered monsters
        self.next_id = self.next_id.max(monster.id.0.saturating_add(1));

        let node = Node {
            monster,
            prev: self.tail,
            next: None,
        };

        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                Handle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                Handle {
                    index,
                    generation: 0,
                }
            }
        };

        match self.tail {
            Some(tail) => self.linked_mut(tail).next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        self.len += 1;

        Ok(handle)
    }

    /// Create a monster with the next free id and the species' base speed
    pub fn spawn(&mut self, species: Species, position: u8, now: Millis) -> Result<Handle> {
        let monster = Monster::new(MonsterId(self.next_id), species, position, now);
        self.insert(monster)
    }

    /// Unlink and return the monster behind `handle`
    ///
    /// Returns `None` for a stale or unknown handle.
    pub fn remove(&mut self, handle: Handle) -> Option<Monster> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);

        match node.prev {
            Some(prev) => self.linked_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        // A successor of the old head gets `prev = None` here, not a stale link
        match node.next {
            Some(next) => self.linked_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }
        self.len -= 1;

        debug_assert!(self.check_links().is_ok(), "{:?}", self.check_links());
        Some(node.monster)
    }

    /// Like `remove`, but an unknown handle is an error
    pub fn try_remove(&mut self, handle: Handle) -> Result<Monster> {
        self.remove(handle).ok_or(PenError::UnknownHandle(handle))
    }

    /// Lazy traversal in arrival order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            registry: self,
            cursor: self.head,
        }
    }

    /// Verify that forward and backward links agree end to end
    pub fn check_links(&self) -> Result<()> {
        let mut expected_prev: Option<Handle> = None;
        let mut cursor = self.head;
        let mut count = 0usize;

        while let Some(handle) = cursor {
            let node = self.node(handle).ok_or_else(|| {
                PenError::CorruptLinks(format!("reachable handle {:?} is vacant", handle))
            })?;
            if node.prev != expected_prev {
                return Err(PenError::CorruptLinks(format!(
                    "{:?} has prev {:?}, expected {:?}",
                    handle, node.prev, expected_prev
                )));
            }
            count += 1;
            if count > self.len {
                return Err(PenError::CorruptLinks(format!(
                    "walked past recorded length {}",
                    self.len
                )));
            }
            expected_prev = Some(handle);
            cursor = node.next;
        }

        if self.tail != expected_prev {
            return Err(PenError::CorruptLinks(format!(
                "tail is {:?}, last reachable is {:?}",
                self.tail, expected_prev
            )));
        }
        if count != self.len {
            return Err(PenError::CorruptLinks(format!(
                "reached {} monsters, recorded {}",
                count, self.len
            )));
        }

        let occupied = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        if occupied != self.len {
            return Err(PenError::CorruptLinks(format!(
                "{} occupied slots but {} linked monsters",
                occupied, self.len
            )));
        }

        Ok(())
    }
}

/// Iterator over `(Handle, &Monster)` in arrival order
pub struct Iter<'a> {
    registry: &'a MonsterRegistry,
    cursor: Option<Handle>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Handle, &'a Monster);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let node = self.registry.node(handle)?;
        self.cursor = node.next;
        Some((handle, &node.monster))
    }
}

impl<'a> IntoIterator for &'a MonsterRegistry {
    type Item = (Handle, &'a Monster);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(registry: &MonsterRegistry) -> Vec<u32> {
        registry.iter().map(|(_, m)| m.id.0).collect()
    }

    fn registry_with(positions: &[u8]) -> (MonsterRegistry, Vec<Handle>) {
        let mut registry = MonsterRegistry::new();
        let handles = positions
            .iter()
            .map(|&p| registry.spawn(Species::Fuzzball, p, 0).unwrap())
            .collect();
        (registry, handles)
    }

    #[test]
    fn test_insert_appends_in_arrival_order() {
        let (registry, handles) = registry_with(&[2, 6, 10]);

        assert_eq!(ids(&registry), vec![0, 1, 2]);
        assert_eq!(registry.head(), Some(handles[0]));
        assert_eq!(registry.tail(), Some(handles[2]));
        assert_eq!(registry.prev_of(handles[0]), None);
        assert_eq!(registry.next_of(handles[2]), None);
        assert!(registry.check_links().is_ok());
    }

    #[test]
    fn test_insert_rejects_out_of_range_position() {
        let mut registry = MonsterRegistry::new();
        let monster = Monster::new(MonsterId(0), Species::Dragon, WRITABLE_WIDTH as u8, 0);

        let err = registry.insert(monster).unwrap_err();
        assert!(matches!(err, PenError::InvalidState(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_middle_rewires_neighbors() {
        let (mut registry, handles) = registry_with(&[2, 6, 10]);

        let removed = registry.remove(handles[1]).unwrap();
        assert_eq!(removed.position, 6);

        assert_eq!(ids(&registry), vec![0, 2]);
        assert_eq!(registry.next_of(handles[0]), Some(handles[2]));
        assert_eq!(registry.prev_of(handles[2]), Some(handles[0]));
        assert!(registry.check_links().is_ok());
    }

    #[test]
    fn test_remove_head_clears_successor_back_link() {
        let (mut registry, handles) = registry_with(&[2, 6, 10]);

        registry.remove(handles[0]).unwrap();

        // The successor becomes head with no stale back-link
        assert_eq!(registry.head(), Some(handles[1]));
        assert_eq!(registry.prev_of(handles[1]), None);
        assert!(registry.check_links().is_ok());
    }

    #[test]
    fn test_remove_tail_updates_tail() {
        let (mut registry, handles) = registry_with(&[2, 6]);

        registry.remove(handles[1]).unwrap();

        assert_eq!(registry.tail(), Some(handles[0]));
        assert_eq!(registry.next_of(handles[0]), None);
        assert!(registry.check_links().is_ok());
    }

    #[test]
    fn test_remove_sole_element_empties_registry() {
        let (mut registry, handles) = registry_with(&[3]);

        registry.remove(handles[0]).unwrap();

        assert!(registry.is_empty());
        assert_eq!(registry.head(), None);
        assert_eq!(registry.tail(), None);
        assert_eq!(registry.iter().count(), 0);
    }

    #[test]
    fn test_stale_handle_is_rejected_after_slot_reuse() {
        let (mut registry, handles) = registry_with(&[1, 2]);

        registry.remove(handles[0]).unwrap();
        let reused = registry.spawn(Species::Bat, 9, 0).unwrap();

        assert!(!registry.contains(handles[0]));
        assert!(registry.get(handles[0]).is_none());
        assert!(registry.remove(handles[0]).is_none());
        assert!(matches!(
            registry.try_remove(handles[0]),
            Err(PenError::UnknownHandle(_))
        ));
        assert_eq!(registry.get(reused).unwrap().position, 9);
        assert_eq!(ids(&registry), vec![1, 2]);
    }

    #[test]
    fn test_ids_stay_unique_after_explicit_insert() {
        let mut registry = MonsterRegistry::new();
        registry
            .insert(Monster::new(MonsterId(7), Species::Slime, 0, 0))
            .unwrap();
        let handle = registry.spawn(Species::Slime, 1, 0).unwrap();

        assert_eq!(registry.get(handle).unwrap().id, MonsterId(8));
        assert_eq!(registry.peek_next_id(), MonsterId(9));
    }

    #[test]
    fn test_removal_during_traversal_with_captured_next() {
        let (mut registry, _) = registry_with(&[0, 1, 2, 3, 4]);

        let mut cursor = registry.head();
        while let Some(handle) = cursor {
            cursor = registry.next_of(handle);
            if registry.get(handle).unwrap().position % 2 == 0 {
                registry.remove(handle);
            }
        }

        assert_eq!(ids(&registry), vec![1, 3]);
        assert!(registry.check_links().is_ok());
    }

    #[test]
    fn test_find_by_id() {
        let (registry, handles) = registry_with(&[4, 5]);
        assert_eq!(registry.find(MonsterId(1)), Some(handles[1]));
        assert_eq!(registry.find(MonsterId(9)), None);
    }
}
