//! Draw-in-order reveal of a batch of points
//!
//! Over the animation duration the first `floor(progress × n)` points are
//! revealed; each frame hands out only the points that became visible since
//! the previous frame.

use crate::projection::Point;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct RevealSequence {
    points: Vec<Point>,
    duration: Duration,
    started: Option<Duration>,
    revealed: usize,
}

impl RevealSequence {
    pub fn new(points: Vec<Point>, duration: Duration) -> Self {
        Self {
            points,
            duration,
            started: None,
            revealed: 0,
        }
    }

    /// Start over from the first point with a new point set
    pub fn restart(&mut self, points: Vec<Point>) {
        self.points = points;
        self.started = None;
        self.revealed = 0;
    }

    /// Points newly revealed at frame time `now`
    pub fn frame(&mut self, now: Duration) -> &[Point] {
        let started = *self.started.get_or_insert(now);
        let total = self.points.len();

        let target = if self.duration.is_zero() {
            total
        } else {
            let progress = (now.saturating_sub(started).as_secs_f64()
                / self.duration.as_secs_f64())
            .min(1.0);
            ((progress * total as f64).floor() as usize).min(total)
        };

        let from = self.revealed;
        self.revealed = target.max(from);
        &self.points[from..self.revealed]
    }

    /// Reveal everything left and return it
    pub fn finish(&mut self) -> &[Point] {
        let from = self.revealed;
        self.revealed = self.points.len();
        &self.points[from..]
    }

    /// Everything revealed so far
    pub fn revealed(&self) -> &[Point] {
        &self.points[..self.revealed]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_finished(&self) -> bool {
        self.revealed == self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| Point {
                x: i as f64,
                y: 0.0,
            })
            .collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_reveal_in_order() {
        let mut reveal = RevealSequence::new(points(4), ms(1000));

        assert!(reveal.frame(ms(100)).is_empty());
        let first: Vec<f64> = reveal.frame(ms(600)).iter().map(|p| p.x).collect();
        assert_eq!(first, [0.0, 1.0]);
        assert!(reveal.frame(ms(700)).is_empty());
        let rest: Vec<f64> = reveal.frame(ms(1100)).iter().map(|p| p.x).collect();
        assert_eq!(rest, [2.0, 3.0]);
        assert!(reveal.is_finished());
        assert!(reveal.frame(ms(5000)).is_empty());
    }

    #[test]
    fn test_restart_from_beginning() {
        let mut reveal = RevealSequence::new(points(2), ms(1000));
        reveal.frame(ms(0));
        reveal.frame(ms(1000));
        assert!(reveal.is_finished());

        reveal.restart(points(3));
        assert!(reveal.revealed().is_empty());
        reveal.frame(ms(2000));
        assert_eq!(reveal.frame(ms(3000)).len(), 3);
    }

    #[test]
    fn test_finish_flushes_remaining() {
        let mut reveal = RevealSequence::new(points(5), ms(1000));
        reveal.frame(ms(0));
        reveal.frame(ms(400));
        assert_eq!(reveal.revealed().len(), 2);
        assert_eq!(reveal.finish().len(), 3);
        assert!(reveal.is_finished());
    }

    #[test]
    fn test_zero_duration_reveals_all() {
        let mut reveal = RevealSequence::new(points(3), Duration::ZERO);
        assert_eq!(reveal.frame(ms(0)).len(), 3);
    }

    #[test]
    fn test_empty_batch() {
        let mut reveal = RevealSequence::new(Vec::new(), ms(1000));
        assert!(reveal.frame(ms(0)).is_empty());
        assert!(reveal.is_finished());
    }
}
