use tilepath_core::{MoveSignature, Point};

/// The map-side collaborator: decides which tiles block which units.
///
/// Any `Fn(Point, MoveSignature) -> bool` closure is a `BlockingSource` whose
/// signatures are equivalent only when equal.
pub trait BlockingSource {
    /// Whether `tile` is impassable for a unit moving with `sig`.
    fn is_blocking(&self, tile: Point, sig: MoveSignature) -> bool;

    /// Whether two signatures block exactly the same tiles.
    ///
    /// Equivalent signatures share one cached blocking map per tick.
    fn equivalent_blocking(&self, a: MoveSignature, b: MoveSignature) -> bool {
        a == b
    }
}

impl<F> BlockingSource for F
where
    F: Fn(Point, MoveSignature) -> bool,
{
    fn is_blocking(&self, tile: Point, sig: MoveSignature) -> bool {
        self(tile, sig)
    }
}
