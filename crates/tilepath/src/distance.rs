use tilepath_core::Point;

/// Cost of one orthogonal step.
pub const STRAIGHT_COST: u32 = 70;
/// Cost of one diagonal step. 99 / 70 ≈ √2.
pub const DIAGONAL_COST: u32 = 99;

/// Octile distance between two tiles under the 70/99 step costs.
///
/// Admissible and consistent for 8-connected movement, and exact on an
/// open grid. Also used as the cost of a single step between neighbours.
#[inline]
pub fn estimate(a: Point, b: Point) -> u32 {
    let dx = (a.x - b.x).unsigned_abs();
    let dy = (a.y - b.y).unsigned_abs();
    dx.min(dy) * (DIAGONAL_COST - STRAIGHT_COST) + dx.max(dy) * STRAIGHT_COST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_steps() {
        let o = Point::new(5, 5);
        assert_eq!(estimate(o, o), 0);
        assert_eq!(estimate(o, Point::new(6, 5)), STRAIGHT_COST);
        assert_eq!(estimate(o, Point::new(5, 4)), STRAIGHT_COST);
        assert_eq!(estimate(o, Point::new(4, 4)), DIAGONAL_COST);
    }

    #[test]
    fn mixed_moves() {
        // 3 diagonal + 4 straight.
        assert_eq!(estimate(Point::new(0, 0), Point::new(7, 3)), 3 * 99 + 4 * 70);
        assert_eq!(estimate(Point::new(7, 3), Point::new(0, 0)), 3 * 99 + 4 * 70);
        assert_eq!(estimate(Point::new(-2, 1), Point::new(-2, 9)), 8 * 70);
    }

    #[test]
    fn triangle_inequality_on_neighbours() {
        // Consistency: h(a) <= step(a, n) + h(n) for every neighbour n.
        let target = Point::new(3, -2);
        for y in -4..=4 {
            for x in -4..=4 {
                let a = Point::new(x, y);
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let n = a.shift(dx, dy);
                        assert!(estimate(a, target) <= estimate(a, n) + estimate(n, target));
                    }
                }
            }
        }
    }
}
