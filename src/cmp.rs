use std::cmp::Ordering;

/// Total order used to place values in the list.
pub trait Comparator<T: ?Sized> {
    fn cmp(&self, a: &T, b: &T) -> Ordering;

    fn less(&self, a: &T, b: &T) -> bool {
        self.cmp(a, b) == Ordering::Less
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn cmp(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Natural ordering of `T`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultComparator;

impl<T: Ord + ?Sized> Comparator<T> for DefaultComparator {
    fn cmp(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReverseComparator;

impl<T: Ord + ?Sized> Comparator<T> for ReverseComparator {
    fn cmp(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}
