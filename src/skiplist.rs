use crate::arena::Arena;
use crate::cmp::{Comparator, DefaultComparator};
use crate::ensure;
use crate::error::Error;
use crate::iter::{Direction, Position, SkipListIterator, Values};
use crate::node::{Node, Role, Rung, RungId};
use crate::options::{SkipListOptions, MAX_HEIGHT};
use crate::tracing_helpers::{debug_log, trace_log};
use arrayvec::ArrayVec;
use common::{BernoulliCoin, Coin};
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};

/// Last rung on each level that still sorts before the search target.
type Path = ArrayVec<Option<RungId>, MAX_HEIGHT>;

/// Ordered multiset on a randomized skip list.
///
/// Level 0 links every occurrence in order, duplicates included. Each distinct
/// value owns a tower that also appears on levels `1..height`, and those upper
/// levels are what the searches descend through.
#[derive(Clone)]
pub struct SkipList<T, C = DefaultComparator, G = BernoulliCoin> {
    nodes: Arena<Node>,
    rungs: Arena<Rung<T>>,
    head: Vec<Option<RungId>>,
    tail: Vec<Option<RungId>>,
    len: usize,
    max_height: usize,
    cmp: C,
    coin: G,
}

impl<T: Ord> SkipList<T> {
    pub fn new() -> Self {
        Self::with_parts(DefaultComparator, BernoulliCoin::default(), MAX_HEIGHT)
    }

    pub fn with_options(opts: SkipListOptions) -> crate::Result<Self> {
        Ok(Self::with_parts(DefaultComparator, opts.coin()?, opts.max_height))
    }
}

impl<T, C: Comparator<T>> SkipList<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_parts(cmp, BernoulliCoin::default(), MAX_HEIGHT)
    }

    pub fn with_comparator_and_options(cmp: C, opts: SkipListOptions) -> crate::Result<Self> {
        Ok(Self::with_parts(cmp, opts.coin()?, opts.max_height))
    }
}

impl<T, C, G> Default for SkipList<T, C, G>
where
    C: Default,
    G: Default,
{
    fn default() -> Self {
        Self::with_parts(C::default(), G::default(), MAX_HEIGHT)
    }
}

impl<T, C, G> SkipList<T, C, G> {
    pub fn with_coin(cmp: C, coin: G) -> Self {
        Self::with_parts(cmp, coin, MAX_HEIGHT)
    }

    /// `max_height` is clamped to `1..=MAX_HEIGHT`.
    pub fn with_parts(cmp: C, coin: G, max_height: usize) -> Self {
        Self {
            nodes: Arena::new(),
            rungs: Arena::new(),
            head: Vec::new(),
            tail: Vec::new(),
            len: 0,
            max_height: max_height.clamp(1, MAX_HEIGHT),
            cmp,
            coin,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels currently in use, i.e. the tallest tower.
    pub fn height(&self) -> usize {
        self.head.len()
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub fn coin(&self) -> &G {
        &self.coin
    }

    pub fn first(&self) -> Option<&T> {
        self.head.first().copied().flatten().map(|id| self.value_at(id))
    }

    pub fn last(&self) -> Option<&T> {
        self.tail.first().copied().flatten().map(|id| self.value_at(id))
    }

    pub fn begin(&self) -> Position {
        match self.bottom_head() {
            Some(id) => Position::at(id, Direction::Forward),
            None => self.end(),
        }
    }

    pub fn end(&self) -> Position {
        Position::past_end(self.bottom_tail(), Direction::Forward)
    }

    pub fn rbegin(&self) -> Position {
        match self.bottom_tail() {
            Some(id) => Position::at(id, Direction::Backward),
            None => self.rend(),
        }
    }

    pub fn rend(&self) -> Position {
        Position::past_end(self.bottom_head(), Direction::Backward)
    }

    /// The element a position refers to.
    pub fn get(&self, pos: Position) -> crate::Result<&T> {
        ensure!(!pos.is_end(), Error::InvalidIterator);
        let id = pos.rung.ok_or(Error::InvalidIterator)?;
        ensure!(self.rungs.contains(id), Error::InvalidIterator);
        Ok(self.value_at(id))
    }

    /// Steps one element in the position's direction. Stepping off the last
    /// element yields the end sentinel, stepping from the sentinel fails.
    pub fn next_position(&self, pos: Position) -> crate::Result<Position> {
        ensure!(!pos.is_end(), Error::InvalidIterator);
        let id = pos.rung.ok_or(Error::InvalidIterator)?;
        ensure!(self.rungs.contains(id), Error::InvalidIterator);
        Ok(match self.step(id, pos.direction) {
            Some(next) => Position::at(next, pos.direction),
            None => Position::past_end(Some(id), pos.direction),
        })
    }

    /// Steps one element against the position's direction. The end sentinel
    /// steps back onto the outermost element; the first element has nowhere
    /// to go.
    pub fn prev_position(&self, pos: Position) -> crate::Result<Position> {
        let dir = pos.direction;
        if pos.is_end() {
            let edge = match dir {
                Direction::Forward => self.bottom_tail(),
                Direction::Backward => self.bottom_head(),
            };
            return edge
                .map(|id| Position::at(id, dir))
                .ok_or(Error::InvalidIterator);
        }
        let id = pos.rung.ok_or(Error::InvalidIterator)?;
        ensure!(self.rungs.contains(id), Error::InvalidIterator);
        self.step(id, dir.reverse())
            .map(|prev| Position::at(prev, dir))
            .ok_or(Error::InvalidIterator)
    }

    pub fn iter(&self) -> Values<'_, T, C, G> {
        Values::new(self, self.bottom_head(), self.bottom_tail(), Direction::Forward)
    }

    /// Elements in `[first, last)`, walking in the positions' direction.
    pub fn range(&self, first: Position, last: Position) -> crate::Result<Values<'_, T, C, G>> {
        ensure!(first.direction == last.direction, Error::InvalidIterator);
        let from = self.bound(first)?;
        let until = self.bound(last)?;
        Ok(self.span(from, until, first.direction))
    }

    pub fn cursor(&self) -> SkipListIterator<'_, T, C, G> {
        SkipListIterator::new(self, self.begin())
    }

    pub fn cursor_at(&self, pos: Position) -> SkipListIterator<'_, T, C, G> {
        SkipListIterator::new(self, pos)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.nodes.clear();
        self.rungs.clear();
        self.head.clear();
        self.tail.clear();
        self.len = 0;
        self
    }

    /// Removes the referenced occurrence. The end sentinel and an empty list
    /// are no-ops.
    pub fn erase(&mut self, pos: Position) -> crate::Result<&mut Self> {
        if pos.is_end() || self.is_empty() {
            return Ok(self);
        }
        let id = pos.rung.ok_or(Error::InvalidIterator)?;
        ensure!(self.rungs.contains(id), Error::InvalidIterator);
        self.erase_rung(id);
        Ok(self)
    }

    /// Removes every occurrence in `[first, last)`. Stops early at the end
    /// sentinel when `last` is never reached. Positions that disagree on
    /// direction, or a stale `last`, fail before anything is removed.
    pub fn erase_range(&mut self, first: Position, last: Position) -> crate::Result<&mut Self> {
        ensure!(first.direction == last.direction, Error::InvalidIterator);
        self.bound(first)?;
        self.bound(last)?;
        let mut pos = first;
        while pos != last && !pos.is_end() {
            let next = self.next_position(pos)?;
            self.erase_rung(pos.rung.ok_or(Error::InvalidIterator)?);
            pos = next;
        }
        Ok(self)
    }

    /// Writes one line per element, left to right, with the number of levels
    /// that reference that occurrence.
    pub fn dump<W: fmt::Write>(&self, w: &mut W) -> fmt::Result
    where
        T: Debug,
    {
        let mut cursor = self.bottom_head();
        while let Some(id) = cursor {
            let rung = &self.rungs[id];
            let levels = match rung.role {
                Role::Duplicate(_) => 1,
                _ => self.nodes[rung.node].height(),
            };
            writeln!(w, "{:?} (levels: {})", self.value_at(id), levels)?;
            cursor = rung.next;
        }
        Ok(())
    }

    pub(crate) fn value_at(&self, id: RungId) -> &T {
        let rung = &self.rungs[id];
        match rung.value() {
            Some(value) => value,
            None => self.value_at(self.nodes[rung.node].tower[0]),
        }
    }

    pub(crate) fn step(&self, id: RungId, dir: Direction) -> Option<RungId> {
        let rung = &self.rungs[id];
        match dir {
            Direction::Forward => rung.next,
            Direction::Backward => rung.prev,
        }
    }

    pub(crate) fn span(
        &self,
        from: Option<RungId>,
        until: Option<RungId>,
        dir: Direction,
    ) -> Values<'_, T, C, G> {
        if from.is_none() || from == until {
            return Values::new(self, None, None, dir);
        }
        let back = match (until, dir) {
            (Some(id), _) => self.step(id, dir.reverse()),
            (None, Direction::Forward) => self.bottom_tail(),
            (None, Direction::Backward) => self.bottom_head(),
        };
        Values::new(self, from, back, dir)
    }

    fn bound(&self, pos: Position) -> crate::Result<Option<RungId>> {
        if pos.is_end() {
            return Ok(None);
        }
        let id = pos.rung.ok_or(Error::InvalidIterator)?;
        ensure!(self.rungs.contains(id), Error::InvalidIterator);
        Ok(Some(id))
    }

    fn bottom_head(&self) -> Option<RungId> {
        self.head.first().copied().flatten()
    }

    fn bottom_tail(&self) -> Option<RungId> {
        self.tail.first().copied().flatten()
    }

    fn position_of(&self, at: Option<RungId>) -> Position {
        match at {
            Some(id) => Position::at(id, Direction::Forward),
            None => self.end(),
        }
    }

    /// Splices `rung` after `pred` on `level`, or at the front when `pred` is
    /// `None`.
    fn link_after(&mut self, level: usize, pred: Option<RungId>, rung: RungId) {
        let next = match pred {
            Some(p) => self.rungs[p].next,
            None => self.head[level],
        };
        {
            let r = &mut self.rungs[rung];
            r.prev = pred;
            r.next = next;
        }
        match pred {
            Some(p) => self.rungs[p].next = Some(rung),
            None => self.head[level] = Some(rung),
        }
        match next {
            Some(n) => self.rungs[n].prev = Some(rung),
            None => self.tail[level] = Some(rung),
        }
    }

    fn unlink(&mut self, rung: RungId) {
        let (level, prev, next) = {
            let r = &self.rungs[rung];
            (r.level, r.prev, r.next)
        };
        match prev {
            Some(p) => self.rungs[p].next = next,
            None => self.head[level] = next,
        }
        match next {
            Some(n) => self.rungs[n].prev = prev,
            None => self.tail[level] = prev,
        }
    }

    fn erase_rung(&mut self, id: RungId) {
        let node = self.rungs[id].node;
        if self.rungs[id].is_duplicate() {
            self.unlink(id);
            self.rungs.free(id);
            self.len -= 1;
            return;
        }
        let heir = self.rungs[id]
            .next
            .filter(|next| self.rungs[*next].node == node);
        match heir {
            Some(heir) => {
                trace_log!(?heir, "promoting duplicate to primary");
                self.rungs[heir].promote();
                self.nodes[node].tower[0] = heir;
                self.unlink(id);
                self.rungs.free(id);
            }
            None => {
                let tower = std::mem::take(&mut self.nodes[node].tower);
                for rung in tower.into_iter().rev() {
                    self.unlink(rung);
                    self.rungs.free(rung);
                }
                self.nodes.free(node);
                self.shrink();
            }
        }
        self.len -= 1;
    }

    /// Drops empty levels off the top.
    fn shrink(&mut self) {
        while let Some(None) = self.head.last() {
            self.head.pop();
            self.tail.pop();
            debug_log!(height = self.head.len(), "dropped empty top level");
        }
    }
}

impl<T, C, G> SkipList<T, C, G>
where
    C: Comparator<T>,
{
    /// First occurrence not less than `value`.
    pub fn lower_bound(&self, value: &T) -> Position {
        let (_, at) = self.descend(|v| self.cmp.less(v, value));
        self.position_of(at)
    }

    /// First occurrence greater than `value`.
    pub fn upper_bound(&self, value: &T) -> Position {
        let (_, at) = self.descend(|v| !self.cmp.less(value, v));
        self.position_of(at)
    }

    pub fn find(&self, value: &T) -> Position {
        let (_, at) = self.descend(|v| self.cmp.less(v, value));
        match at {
            Some(id) if self.cmp.cmp(self.value_at(id), value) == Ordering::Equal => {
                Position::at(id, Direction::Forward)
            }
            _ => self.end(),
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        !self.find(value).is_end()
    }

    pub fn count(&self, value: &T) -> usize {
        let (_, lo) = self.descend(|v| self.cmp.less(v, value));
        let (_, hi) = self.descend(|v| !self.cmp.less(value, v));
        self.span(lo, hi, Direction::Forward).count()
    }

    pub fn equal_range(&self, value: &T) -> (Position, Position) {
        (self.lower_bound(value), self.upper_bound(value))
    }

    /// Walks down from the top level. `before` tells whether a value still
    /// sorts ahead of the target. Returns the last rung per level for which it
    /// holds and the first level-0 rung for which it does not.
    fn descend<F>(&self, before: F) -> (Path, Option<RungId>)
    where
        F: Fn(&T) -> bool,
    {
        let mut path: Path = self.head.iter().map(|_| None).collect();
        let mut pred: Option<RungId> = None;
        let mut candidate = None;
        for level in (0..self.head.len()).rev() {
            if let Some(p) = pred {
                pred = Some(self.nodes[self.rungs[p].node].tower[level]);
            }
            candidate = match pred {
                Some(p) => self.rungs[p].next,
                None => self.head[level],
            };
            while let Some(c) = candidate {
                if !before(self.value_at(c)) {
                    break;
                }
                pred = Some(c);
                candidate = self.rungs[c].next;
            }
            path[level] = pred;
        }
        (path, candidate)
    }

    /// Walks every level and checks the structural invariants, reporting the
    /// first violation found.
    pub fn validate(&self) -> crate::Result<()> {
        let broken = Error::BrokenInvariant;
        ensure!(
            self.head.len() == self.tail.len(),
            broken(format!("{} heads but {} tails", self.head.len(), self.tail.len()))
        );
        ensure!(
            self.head.len() <= self.max_height,
            broken(format!("height {} above cap {}", self.head.len(), self.max_height))
        );
        if self.len == 0 {
            ensure!(
                self.head.is_empty() && self.nodes.len() == 0 && self.rungs.len() == 0,
                broken("empty list still holds levels or nodes".to_string())
            );
            return Ok(());
        }

        let mut total = 0;
        let mut tallest = 0;
        let mut primaries = 0;
        for level in 0..self.head.len() {
            let mut prev: Option<RungId> = None;
            let mut cursor = self.head[level];
            let mut count = 0;
            ensure!(cursor.is_some(), broken(format!("level {} is empty", level)));
            while let Some(id) = cursor {
                let rung = self
                    .rungs
                    .get(id)
                    .ok_or_else(|| broken(format!("dangling rung {:?} on level {}", id, level)))?;
                let node = self
                    .nodes
                    .get(rung.node)
                    .ok_or_else(|| broken(format!("rung {:?} has no node", id)))?;
                ensure!(
                    rung.level == level,
                    broken(format!("rung {:?} on level {} says {}", id, level, rung.level))
                );
                ensure!(
                    rung.prev == prev,
                    broken(format!("rung {:?} has a wrong back-link", id))
                );
                ensure!(
                    (level == 0) == rung.value().is_some(),
                    broken(format!("rung {:?} on level {} has the wrong role", id, level))
                );
                match rung.role {
                    Role::Primary(_) | Role::Upper => {
                        ensure!(
                            node.tower.get(level) == Some(&id),
                            broken(format!("primary {:?} missing from its tower", id))
                        );
                        if level == 0 {
                            primaries += 1;
                            tallest = tallest.max(node.height());
                            for (l, r) in node.tower.iter().enumerate() {
                                let found = self.rungs.get(*r).map(|r| (r.level, r.node));
                                ensure!(
                                    found == Some((l, rung.node)),
                                    broken(format!("tower of {:?} broken at level {}", id, l))
                                );
                            }
                        }
                    }
                    Role::Duplicate(_) => {
                        ensure!(
                            node.tower[0] != id,
                            broken(format!("duplicate {:?} owns a tower", id))
                        );
                        ensure!(
                            prev.map(|p| self.rungs[p].node) == Some(rung.node),
                            broken(format!("duplicate {:?} does not follow its value", id))
                        );
                    }
                }
                if let Some(p) = prev {
                    let ord = self.cmp.cmp(self.value_at(p), self.value_at(id));
                    let same = self.rungs[p].node == rung.node;
                    if level == 0 {
                        ensure!(
                            ord != Ordering::Greater && same == (ord == Ordering::Equal),
                            broken(format!("level 0 out of order at {:?}", id))
                        );
                    } else {
                        ensure!(
                            ord == Ordering::Less,
                            broken(format!("level {} not strictly increasing at {:?}", level, id))
                        );
                    }
                }
                count += 1;
                prev = cursor;
                cursor = rung.next;
            }
            ensure!(
                self.tail[level] == prev,
                broken(format!("tail of level {} is stale", level))
            );
            if level == 0 {
                ensure!(
                    count == self.len,
                    broken(format!("level 0 holds {} rungs, len is {}", count, self.len))
                );
            }
            total += count;
        }
        ensure!(
            tallest == self.head.len(),
            broken(format!("tallest tower {} but {} levels", tallest, self.head.len()))
        );
        ensure!(
            total == self.rungs.len(),
            broken(format!("{} rungs linked, {} allocated", total, self.rungs.len()))
        );
        ensure!(
            primaries == self.nodes.len(),
            broken(format!("{} primaries for {} nodes", primaries, self.nodes.len()))
        );
        Ok(())
    }
}

impl<T, C, G> SkipList<T, C, G>
where
    C: Comparator<T>,
    G: Coin,
{
    pub fn insert(&mut self, value: T) -> &mut Self {
        self.insert_value(value);
        self
    }

    /// Inserts every item left to right.
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) -> &mut Self {
        for value in iter {
            self.insert_value(value);
        }
        self
    }

    fn insert_value(&mut self, value: T) -> RungId {
        if self.is_empty() {
            let node = self.nodes.alloc(Node::default());
            let rung = self.rungs.alloc(Rung::primary(node, value));
            self.nodes[node].tower.push(rung);
            self.head = vec![Some(rung)];
            self.tail = vec![Some(rung)];
            self.len = 1;
            return rung;
        }

        let (path, at) = self.descend(|v| self.cmp.less(v, &value));
        if let Some(found) = at {
            if !self.cmp.less(&value, self.value_at(found)) {
                return self.attach_duplicate(found, value);
            }
        }
        self.link_new_value(value, &path)
    }

    /// Links a duplicate after the last equal occurrence, so equal values
    /// keep insertion order.
    fn attach_duplicate(&mut self, found: RungId, value: T) -> RungId {
        let node = self.rungs[found].node;
        let mut last = found;
        while let Some(next) = self.rungs[last].next {
            if self.rungs[next].node != node {
                break;
            }
            last = next;
        }
        let rung = self.rungs.alloc(Rung::duplicate(node, value));
        self.link_after(0, Some(last), rung);
        self.len += 1;
        trace_log!(?rung, "attached duplicate");
        rung
    }

    fn link_new_value(&mut self, value: T, path: &Path) -> RungId {
        let node = self.nodes.alloc(Node::default());
        let base = self.rungs.alloc(Rung::primary(node, value));
        self.nodes[node].tower.push(base);
        self.link_after(0, path[0], base);

        let mut level = 0;
        while level + 1 < self.max_height && self.coin.next() {
            level += 1;
            let rung = self.rungs.alloc(Rung::upper(node, level));
            self.nodes[node].tower.push(rung);
            if level == self.head.len() {
                self.head.push(Some(rung));
                self.tail.push(Some(rung));
                debug_log!(height = self.head.len(), "opened new top level");
                break;
            }
            self.link_after(level, path[level], rung);
        }
        trace_log!(height = level + 1, "linked new tower");
        self.len += 1;
        base
    }
}

impl<T: PartialEq, C, G> PartialEq for SkipList<T, C, G> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C, G> Eq for SkipList<T, C, G> {}

impl<T: Debug, C, G> Debug for SkipList<T, C, G> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Debug, C, G> Display for SkipList<T, C, G> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.dump(f)
    }
}

impl<T: Ord> FromIterator<T> for SkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.insert_iter(iter);
        list
    }
}

impl<T, C, G> Extend<T> for SkipList<T, C, G>
where
    C: Comparator<T>,
    G: Coin,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_iter(iter);
    }
}

impl<'a, T, C, G> IntoIterator for &'a SkipList<T, C, G> {
    type Item = &'a T;
    type IntoIter = Values<'a, T, C, G>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::cmp::{DefaultComparator, ReverseComparator};
    use crate::iter::Iter;
    use crate::skiplist::SkipList;
    use crate::{Error, SkipListOptions};
    use pretty_assertions::assert_eq;
    use test_utils::ScriptedCoin;

    fn scripted(draws: &[bool]) -> SkipList<i32, DefaultComparator, ScriptedCoin> {
        SkipList::with_coin(DefaultComparator, ScriptedCoin::new(draws))
    }

    fn seeded(seed: u64) -> SkipList<i32> {
        SkipList::with_options(SkipListOptions::default().seed(seed)).unwrap()
    }

    fn values<C, G>(list: &SkipList<i32, C, G>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_empty() {
        let list: SkipList<i32> = SkipList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.height(), 0);
        assert_eq!(list.begin(), list.end());
        assert_eq!(list.rbegin(), list.rend());
        assert_eq!(list.first(), None);
        assert!(list.find(&1).is_end());
        assert_eq!(list.count(&1), 0);
        list.validate().unwrap();
    }

    #[test]
    fn test_insert_with_duplicates() {
        let mut list = seeded(0xdeadbeef);
        list.insert(1).insert(3).insert(3).insert(2).insert(10);
        assert_eq!(values(&list), vec![1, 2, 3, 3, 10]);
        assert_eq!(list.len(), 5);
        assert_eq!(list.count(&3), 2);
        list.validate().unwrap();

        list.insert_iter([6, 11, 10, 6]);
        assert_eq!(values(&list), vec![1, 2, 3, 3, 6, 6, 10, 10, 11]);
        assert_eq!(list.len(), 9);
        list.validate().unwrap();
    }

    #[test]
    fn test_first_insert_does_not_draw() {
        let mut list = scripted(&[true]);
        list.insert(5);
        assert_eq!(list.coin().draws_taken(), 0);
        assert_eq!(list.height(), 1);
    }

    #[test]
    fn test_duplicates_never_draw() {
        let mut list = scripted(&[true]);
        list.insert(5);
        list.insert(5).insert(5);
        assert_eq!(list.coin().draws_taken(), 0);
        assert_eq!(list.height(), 1);
        assert_eq!(list.count(&5), 3);
        list.validate().unwrap();
    }

    #[test]
    fn test_growth_adds_one_level_at_a_time() {
        let mut list = scripted(&[true]);
        for v in 0..5 {
            list.insert(v);
            list.validate().unwrap();
        }
        // every new value opens exactly one new top level
        assert_eq!(list.height(), 5);
        assert_eq!(values(&list), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_flat_coin_keeps_one_level() {
        let mut list = SkipList::with_coin(DefaultComparator, ScriptedCoin::flat());
        list.insert_iter([4, 2, 9, 2]);
        assert_eq!(list.height(), 1);
        assert_eq!(values(&list), vec![2, 2, 4, 9]);
        list.validate().unwrap();
    }

    #[test]
    fn test_max_height_caps_growth() {
        let mut list = SkipList::with_parts(DefaultComparator, ScriptedCoin::always(), 3);
        for v in 0..20 {
            list.insert(v);
        }
        assert_eq!(list.height(), 3);
        list.validate().unwrap();
    }

    #[test]
    fn test_bounds() {
        let mut list = seeded(7);
        list.insert_iter([1, 3, 3, 5, 7]);
        assert_eq!(list.get(list.lower_bound(&3)), Ok(&3));
        assert_eq!(list.get(list.upper_bound(&3)), Ok(&5));
        assert_eq!(list.get(list.lower_bound(&4)), Ok(&5));
        assert_eq!(list.get(list.lower_bound(&0)), Ok(&1));
        assert!(list.lower_bound(&8).is_end());
        assert!(list.upper_bound(&7).is_end());
        assert!(list.find(&4).is_end());
        assert_eq!(list.get(list.find(&7)), Ok(&7));

        // lower_bound lands on the first of the duplicates
        let lb = list.lower_bound(&3);
        assert_eq!(list.prev_position(lb).and_then(|p| list.get(p)), Ok(&1));
    }

    #[test]
    fn test_equal_range_matches_count() {
        let mut list = seeded(99);
        list.insert_iter([4, 4, 4, 1, 9, 4]);
        let (lo, hi) = list.equal_range(&4);
        assert_eq!(list.range(lo, hi).unwrap().count(), list.count(&4));
        assert_eq!(list.count(&4), 4);
        let (lo, hi) = list.equal_range(&5);
        assert_eq!(lo, hi);
        assert_eq!(list.range(lo, hi).unwrap().count(), 0);
    }

    #[test]
    fn test_erase_duplicate_and_primary() {
        let mut list = scripted(&[true, false]);
        list.insert_iter([2, 6, 6, 6, 8]);
        list.validate().unwrap();

        // second occurrence is a duplicate rung
        let second = list.next_position(list.find(&6)).unwrap();
        list.erase(second).unwrap();
        assert_eq!(list.count(&6), 2);
        list.validate().unwrap();

        // primary goes, the remaining duplicate inherits the tower
        let height = list.height();
        list.erase(list.find(&6)).unwrap();
        assert_eq!(list.count(&6), 1);
        assert_eq!(list.height(), height);
        list.validate().unwrap();

        list.erase(list.find(&6)).unwrap();
        assert!(!list.contains(&6));
        assert_eq!(values(&list), vec![2, 8]);
        list.validate().unwrap();
    }

    #[test]
    fn test_erase_shrinks_levels() {
        let mut list = scripted(&[true]);
        list.insert_iter([1, 2, 3]);
        assert_eq!(list.height(), 3);
        list.erase(list.find(&3)).unwrap();
        assert_eq!(list.height(), 2);
        list.validate().unwrap();
        list.erase(list.find(&1)).unwrap();
        assert_eq!(list.height(), 2);
        list.erase(list.find(&2)).unwrap();
        assert_eq!(list.height(), 0);
        assert!(list.is_empty());
        list.validate().unwrap();
    }

    #[test]
    fn test_erase_end_and_empty_are_noops() {
        let mut list = seeded(1);
        list.erase(list.end()).unwrap();
        list.clear();
        list.insert(1);
        let end = list.end();
        list.erase(end).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_stale_position() {
        let mut list = seeded(3);
        list.insert_iter([1, 2, 3]);
        let two = list.find(&2);
        let three = list.find(&3);
        list.erase(two).unwrap();
        assert_eq!(list.get(two), Err(Error::InvalidIterator));
        assert_eq!(list.erase(two).err(), Some(Error::InvalidIterator));
        assert_eq!(list.get(three), Ok(&3));
        list.insert(2);
        assert_eq!(list.get(two), Err(Error::InvalidIterator));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_sentinel_navigation() {
        let mut list = seeded(5);
        list.insert_iter([10, 20, 30]);
        let end = list.end();
        assert_eq!(list.get(end), Err(Error::InvalidIterator));
        assert_eq!(list.next_position(end), Err(Error::InvalidIterator));
        let last = list.prev_position(end).unwrap();
        assert_eq!(list.get(last), Ok(&30));
        assert_eq!(list.next_position(last), Ok(end));
        assert_eq!(list.prev_position(list.begin()), Err(Error::InvalidIterator));
        assert_eq!(list.get(Default::default()), Err(Error::InvalidIterator));
    }

    #[test]
    fn test_reverse_positions() {
        let mut list = seeded(8);
        list.insert_iter([1, 2, 3]);
        let mut pos = list.rbegin();
        let mut seen = vec![];
        while pos != list.rend() {
            seen.push(*list.get(pos).unwrap());
            pos = list.next_position(pos).unwrap();
        }
        assert_eq!(seen, vec![3, 2, 1]);
        assert_eq!(list.get(list.prev_position(list.rend()).unwrap()), Ok(&1));
        assert_eq!(list.prev_position(list.rbegin()), Err(Error::InvalidIterator));
    }

    #[test]
    fn test_erase_range_rejects_mixed_directions() {
        let mut list = seeded(12);
        list.insert_iter([1, 2, 3, 4, 5]);
        let first = list.find(&2);
        let last = list.rend();
        assert_eq!(list.erase_range(first, last).err(), Some(Error::InvalidIterator));
        assert_eq!(values(&list), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_erase_range_rejects_stale_last() {
        let mut list = seeded(13);
        list.insert_iter([1, 2, 3, 4, 5]);
        let last = list.find(&4);
        list.erase(last).unwrap();
        let first = list.find(&2);
        assert_eq!(list.erase_range(first, last).err(), Some(Error::InvalidIterator));
        assert_eq!(values(&list), vec![1, 2, 3, 5]);
        list.validate().unwrap();
    }

    #[test]
    fn test_duplicates_keep_their_own_values() {
        let by_key = |a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0);
        let mut list = SkipList::with_coin(by_key, ScriptedCoin::always());
        list.insert_iter([(1, 'z'), (5, 'a'), (5, 'b'), (5, 'c'), (7, 'q')]);
        assert_eq!(
            list.iter().copied().collect::<Vec<_>>(),
            vec![(1, 'z'), (5, 'a'), (5, 'b'), (5, 'c'), (7, 'q')]
        );

        // drop the middle occurrence only
        let middle = list.next_position(list.find(&(5, '?'))).unwrap();
        assert_eq!(list.get(middle), Ok(&(5, 'b')));
        list.erase(middle).unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![(1, 'z'), (5, 'a'), (5, 'c'), (7, 'q')]);
        list.validate().unwrap();

        // the heir keeps its own value, not the erased primary's
        list.erase(list.find(&(5, '?'))).unwrap();
        assert_eq!(list.get(list.find(&(5, '?'))), Ok(&(5, 'c')));
        assert_eq!(list.get(list.lower_bound(&(6, '?'))), Ok(&(7, 'q')));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![(1, 'z'), (5, 'c'), (7, 'q')]);
        list.validate().unwrap();
    }

    #[test]
    fn test_erase_range() {
        let mut list = seeded(11);
        list.insert_iter([1, 2, 3, 3, 6, 6, 10, 10, 11]);
        let (lo, hi) = list.equal_range(&10);
        list.erase_range(lo, hi).unwrap();
        assert_eq!(values(&list), vec![1, 2, 3, 3, 6, 6, 11]);
        list.erase_range(list.begin(), list.end()).unwrap();
        assert!(list.is_empty());
        list.validate().unwrap();
    }

    #[test]
    fn test_clone_is_deep() {
        let mut list = seeded(21);
        list.insert_iter([3, 1, 2]);
        let mut copy = list.clone();
        copy.insert(0);
        copy.erase(copy.find(&3)).unwrap();
        assert_eq!(values(&list), vec![1, 2, 3]);
        assert_eq!(values(&copy), vec![0, 1, 2]);
        list.validate().unwrap();
        copy.validate().unwrap();
    }

    #[test]
    fn test_take_leaves_empty() {
        let mut list: SkipList<i32> = SkipList::new();
        list.insert_iter([5, 4]);
        let moved = std::mem::take(&mut list);
        assert!(list.is_empty());
        assert_eq!(values(&moved), vec![4, 5]);
        list.insert(1);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_custom_comparator() {
        let mut list = SkipList::with_comparator(ReverseComparator);
        list.insert_iter([1, 5, 3, 5]);
        assert_eq!(values(&list), vec![5, 5, 3, 1]);
        assert_eq!(list.get(list.lower_bound(&4)), Ok(&3));
        list.validate().unwrap();

        let mut by_abs = SkipList::with_comparator(|a: &i32, b: &i32| a.abs().cmp(&b.abs()));
        by_abs.insert_iter([-3, 1, 3, -2]);
        assert_eq!(by_abs.count(&3), 2);
        // equal under the comparator keeps insertion order
        assert_eq!(by_abs.iter().copied().collect::<Vec<_>>(), vec![1, -2, -3, 3]);
    }

    #[test]
    fn test_dump() {
        let mut list = scripted(&[true, false]);
        list.insert_iter([1, 2, 3, 3]);
        assert_eq!(
            list.to_string(),
            "1 (levels: 1)\n2 (levels: 2)\n3 (levels: 1)\n3 (levels: 1)\n"
        );
        assert_eq!(format!("{:?}", list), "[1, 2, 3, 3]");
    }

    #[test]
    fn test_cursor() {
        let mut list = seeded(4);
        list.insert_iter([1, 3, 5]);
        let mut cursor = list.cursor();
        assert!(cursor.valid());
        assert_eq!(cursor.current(), Ok(&1));
        cursor.seek(&4);
        assert_eq!(cursor.current(), Ok(&5));
        assert!(cursor.next().is_ok());
        assert!(!cursor.valid());
        assert!(cursor.next().is_err());
        assert!(cursor.prev().is_ok());
        assert_eq!(cursor.current(), Ok(&5));
        cursor.seek_to_first();
        assert!(cursor.prev().is_err());
        cursor.seek_to_last();
        assert_eq!(cursor.current(), Ok(&5));
    }

    #[test]
    fn test_validate_many() {
        let mut list = seeded(0xfeed);
        let data = test_utils::sample_values(9, 500, 60);
        for v in &data {
            list.insert(*v as i32);
        }
        list.validate().unwrap();
        assert_eq!(list.len(), 500);
        for v in data.iter().step_by(3) {
            list.erase(list.find(&(*v as i32))).unwrap();
            list.validate().unwrap();
        }
    }
}
