/// Cooperative queue of pending work (catalog deliveries, deferred passes).
///
/// - Items run in `(priority, id)` order; equal priorities keep insertion order.
/// - Cancelling an item never reorders the rest.
/// - Popping can be metered by a [`TickBudget`](crate::budget::TickBudget),
///   one unit per item.

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    // Smaller values run earlier.
    priority: i32,
    id: WorkId,
}

#[derive(Debug)]
struct Item<T> {
    key: Key,
    payload: T,
}

#[derive(Debug)]
pub struct WorkQueue<T> {
    next_id: u64,
    items: Vec<Item<T>>,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            items: Vec::new(),
        }
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, priority: i32, payload: T) -> WorkId {
        let id = WorkId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push(Item {
            key: Key { priority, id },
            payload,
        });
        id
    }

    /// Drops a queued item; `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, id: WorkId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.key.id != id);
        self.items.len() != before
    }

    fn next_index(&self) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .min_by_key(|(_, item)| item.key)
            .map(|(idx, _)| idx)
    }

    /// Pops the next (lowest priority value, then oldest) item.
    pub fn pop_next(&mut self) -> Option<(WorkId, T)> {
        let idx = self.next_index()?;
        let item = self.items.swap_remove(idx);
        Some((item.key.id, item.payload))
    }

    /// Pops the next item if the budget still has a unit for it.
    pub fn pop_next_with_budget(
        &mut self,
        budget: &mut crate::budget::TickBudget,
    ) -> Option<(WorkId, T)> {
        if self.is_empty() || !budget.try_consume(1) {
            return None;
        }
        self.pop_next()
    }
}

#[cfg(test)]
mod tests {
    use super::WorkQueue;
    use crate::budget::TickBudget;

    #[test]
    fn lower_priority_value_runs_first() {
        let mut q = WorkQueue::new();
        q.push(2, "stars");
        q.push(0, "constellations");
        q.push(1, "objects");

        let order: Vec<_> = std::iter::from_fn(|| q.pop_next().map(|(_, v)| v)).collect();
        assert_eq!(order, vec!["constellations", "objects", "stars"]);
    }

    #[test]
    fn same_priority_is_insertion_order() {
        let mut q = WorkQueue::new();
        q.push(0, "a");
        q.push(0, "b");
        q.push(0, "c");

        let order: Vec<_> = std::iter::from_fn(|| q.pop_next().map(|(_, v)| v)).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn cancel_skips_item() {
        let mut q = WorkQueue::new();
        let a = q.push(0, "a");
        q.push(0, "b");
        assert!(q.cancel(a));
        assert!(!q.cancel(a));

        let (_, v) = q.pop_next().unwrap();
        assert_eq!(v, "b");
        assert!(q.pop_next().is_none());
    }

    #[test]
    fn pop_respects_budget_units() {
        let mut q = WorkQueue::new();
        q.push(0, "constellations");
        q.push(1, "objects");
        q.push(2, "stars");

        let mut budget = TickBudget::new(2);
        let ran: Vec<_> =
            std::iter::from_fn(|| q.pop_next_with_budget(&mut budget).map(|(_, v)| v)).collect();
        assert_eq!(ran, vec!["constellations", "objects"]);
        assert!(budget.is_exhausted());
        assert_eq!(q.len(), 1);

        // An empty queue leaves the budget alone.
        let mut budget = TickBudget::new(5);
        q.pop_next_with_budget(&mut budget);
        assert!(q.pop_next_with_budget(&mut budget).is_none());
        assert_eq!(budget.remaining_units(), 4);
    }
}
