use crate::cmp::Comparator;
use crate::node::RungId;
use crate::skiplist::SkipList;

/// Seekable cursor over an ordered collection.
pub trait Iter {
    type Key: ?Sized;
    type Item;
    fn valid(&self) -> bool;
    fn prev(&mut self) -> crate::Result<()>;
    fn next(&mut self) -> crate::Result<()>;
    fn current(&self) -> crate::Result<Self::Item>;
    fn seek(&mut self, target: &Self::Key);
    fn seek_to_first(&mut self);
    fn seek_to_last(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// A spot on level 0 of a `SkipList`.
///
/// Positions are plain handles: they do not borrow the list, and erasing one
/// occurrence leaves positions of every other occurrence usable. Past the last
/// element a position keeps the rung it stepped off from, so stepping back
/// from the end lands on the last element again. `Backward` positions (from
/// `rbegin`/`rend`) walk the back-links with the same rules.
///
/// `Position::default()` refers to nothing and fails on every access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) rung: Option<RungId>,
    pub(crate) past_end: bool,
    pub(crate) direction: Direction,
}

impl Position {
    pub(crate) fn at(rung: RungId, direction: Direction) -> Self {
        Self {
            rung: Some(rung),
            past_end: false,
            direction,
        }
    }

    pub(crate) fn past_end(last: Option<RungId>, direction: Direction) -> Self {
        Self {
            rung: last,
            past_end: true,
            direction,
        }
    }

    pub fn is_end(&self) -> bool {
        self.past_end
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            rung: None,
            past_end: false,
            direction: Direction::Forward,
        }
    }
}

/// Borrowing iterator over a run of level-0 occurrences.
pub struct Values<'a, T, C, G> {
    list: &'a SkipList<T, C, G>,
    front: Option<RungId>,
    back: Option<RungId>,
    direction: Direction,
}

impl<'a, T, C, G> Values<'a, T, C, G> {
    pub(crate) fn new(
        list: &'a SkipList<T, C, G>,
        front: Option<RungId>,
        back: Option<RungId>,
        direction: Direction,
    ) -> Self {
        Self {
            list,
            front,
            back,
            direction,
        }
    }

    fn finish(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<'a, T, C, G> Iterator for Values<'a, T, C, G> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.front?;
        if Some(current) == self.back {
            self.finish();
        } else {
            self.front = self.list.step(current, self.direction);
        }
        Some(self.list.value_at(current))
    }
}

impl<'a, T, C, G> DoubleEndedIterator for Values<'a, T, C, G> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let current = self.back?;
        if Some(current) == self.front {
            self.finish();
        } else {
            self.back = self.list.step(current, self.direction.reverse());
        }
        Some(self.list.value_at(current))
    }
}

impl<'a, T, C, G> Clone for Values<'a, T, C, G> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            front: self.front,
            back: self.back,
            direction: self.direction,
        }
    }
}

pub struct SkipListIterator<'a, T, C, G> {
    list: &'a SkipList<T, C, G>,
    pos: Position,
}

impl<'a, T, C, G> SkipListIterator<'a, T, C, G> {
    pub(crate) fn new(list: &'a SkipList<T, C, G>, pos: Position) -> Self {
        Self { list, pos }
    }

    pub fn position(&self) -> Position {
        self.pos
    }
}

impl<'a, T, C, G> Iter for SkipListIterator<'a, T, C, G>
where
    C: Comparator<T>,
{
    type Key = T;
    type Item = &'a T;

    fn valid(&self) -> bool {
        self.list.get(self.pos).is_ok()
    }

    fn prev(&mut self) -> crate::Result<()> {
        self.pos = self.list.prev_position(self.pos)?;
        Ok(())
    }

    fn next(&mut self) -> crate::Result<()> {
        self.pos = self.list.next_position(self.pos)?;
        Ok(())
    }

    fn current(&self) -> crate::Result<Self::Item> {
        self.list.get(self.pos)
    }

    fn seek(&mut self, target: &T) {
        self.pos = self.list.lower_bound(target);
    }

    fn seek_to_first(&mut self) {
        self.pos = self.list.begin();
    }

    fn seek_to_last(&mut self) {
        self.pos = self.list.prev_position(self.list.end()).unwrap_or(self.list.end());
    }
}
