//! Player-controlled snake: direction state machine, movement and growth.

use std::collections::VecDeque;

use snake_arena_core::{
    BoardSize, Canvas, CellCoord, CellRect, Color, Direction, Event, Painter, Vector, Viewer,
};

use crate::{
    config::SpeedTable,
    entity::{Collidable, TickContext, Tickable},
};

const BODY_GLYPH: char = '0';
const GROWTH_OFFSET: Vector = Vector::new(-1, 0);

/// Composite unit made of one head and an ordered run of body segments.
///
/// The front of `body` touches the head and the back is the tail. The body
/// never shrinks: every move pushes one segment to the front and evicts one
/// from the back, while meals append extra segments behind the tail.
#[derive(Debug)]
pub(crate) struct Snake {
    head: CellCoord,
    body: VecDeque<CellCoord>,
    direction: Direction,
    last_tail: CellCoord,
    score: u32,
    speed: u32,
    speed_table: SpeedTable,
}

impl Snake {
    /// Places the head at the board centre with the body trailing to the left.
    pub(crate) fn new(board: BoardSize, length: u32, speed_table: SpeedTable) -> Self {
        let head = board.center();
        let body: VecDeque<CellCoord> = (1..=length)
            .map(|distance| {
                let offset = i32::try_from(distance).unwrap_or(i32::MAX);
                board.wrap(head.offset(Vector::new(-offset, 0)))
            })
            .collect();
        let last_tail = body.back().copied().unwrap_or(head);
        let speed = speed_table.ticks_per_move(0);
        Self {
            head,
            body,
            direction: Direction::Right,
            last_tail,
            score: 0,
            speed,
            speed_table,
        }
    }

    pub(crate) const fn head(&self) -> CellCoord {
        self.head
    }

    pub(crate) fn body(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.body.iter().copied()
    }

    pub(crate) const fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) const fn last_tail(&self) -> CellCoord {
        self.last_tail
    }

    pub(crate) const fn score(&self) -> u32 {
        self.score
    }

    pub(crate) const fn speed(&self) -> u32 {
        self.speed
    }

    /// Turns the snake unless the request would reverse it into its neck.
    ///
    /// Returns the previous heading when the direction actually changed.
    pub(crate) fn set_direction(&mut self, requested: Direction) -> Option<Direction> {
        let current = self.direction;
        if requested == current || requested == current.opposite() {
            return None;
        }
        self.direction = requested;
        Some(current)
    }

    /// Moves the head one cell, wrapping around the board edges.
    pub(crate) fn advance(&mut self, board: BoardSize) -> (CellCoord, CellCoord) {
        let from = self.head;
        let to = board.wrap(from.offset(self.direction.vector()));
        self.head = to;
        self.body.push_front(from);
        if let Some(evicted) = self.body.pop_back() {
            self.last_tail = evicted;
        }
        (from, to)
    }

    /// Appends one segment next to the tail recorded by the last move.
    pub(crate) fn add_body(&mut self, board: BoardSize) {
        self.body
            .push_back(board.wrap(self.last_tail.offset(GROWTH_OFFSET)));
    }

    /// Wraps every segment onto a board whose dimensions just changed.
    pub(crate) fn fold_onto(&mut self, board: BoardSize) {
        self.head = board.wrap(self.head);
        for segment in &mut self.body {
            *segment = board.wrap(*segment);
        }
        self.last_tail = board.wrap(self.last_tail);
    }

    pub(crate) fn feed(&mut self, bonus: u32, growth: u32, board: BoardSize) {
        self.score = self.score.saturating_add(bonus);
        for _ in 0..growth {
            self.add_body(board);
        }
    }

    fn head_glyph(&self) -> char {
        match self.direction {
            Direction::Left => '<',
            Direction::Right => '>',
            Direction::Up => '▲',
            Direction::Down => '▼',
        }
    }
}

impl Tickable for Snake {
    fn tick(&mut self, ticks: u64, ctx: &mut TickContext<'_>) {
        self.speed = self.speed_table.ticks_per_move(self.score);
        if ticks % u64::from(self.speed) != 0 {
            return;
        }
        let (from, to) = self.advance(ctx.board);
        ctx.events.push(Event::SnakeMoved { from, to });
        ctx.mark_dirty();
    }
}

impl Collidable for Snake {
    fn footprint(&self) -> Vec<CellCoord> {
        std::iter::once(self.head).chain(self.body()).collect()
    }
}

impl Painter for Snake {
    fn paint_on(&self, canvas: &mut dyn Canvas) {
        let window =
            CellRect::from_origin_and_size(CellCoord::new(0, 0), canvas.width(), canvas.height());
        let mut viewer = Viewer::bind(canvas, window);
        for segment in &self.body {
            viewer.put_char(segment.column(), segment.row(), BODY_GLYPH);
            viewer.color(segment.column(), segment.row(), Color::Green);
        }
        viewer.put_char(self.head.column(), self.head.row(), self.head_glyph());
        viewer.color(self.head.column(), self.head.row(), Color::Yellow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_on(board: BoardSize, length: u32) -> Snake {
        Snake::new(board, length, SpeedTable::default())
    }

    #[test]
    fn starts_centred_heading_right_with_body_to_the_left() {
        let snake = snake_on(BoardSize::new(20, 10), 7);
        assert_eq!(snake.head(), CellCoord::new(10, 5));
        assert_eq!(snake.direction(), Direction::Right);
        let body: Vec<_> = snake.body().collect();
        assert_eq!(body.len(), 7);
        assert_eq!(body[0], CellCoord::new(9, 5));
        assert_eq!(body[6], CellCoord::new(3, 5));
        assert_eq!(snake.last_tail(), CellCoord::new(3, 5));
        assert_eq!(snake.speed(), 5);
    }

    #[test]
    fn direction_guard_rejects_only_reversals() {
        for current in Direction::ALL {
            for requested in Direction::ALL {
                let mut snake = snake_on(BoardSize::new(20, 10), 3);
                snake.direction = current;
                let changed = snake.set_direction(requested);
                if requested == current.opposite() || requested == current {
                    assert_eq!(changed, None);
                    assert_eq!(snake.direction(), current);
                } else {
                    assert_eq!(changed, Some(current));
                    assert_eq!(snake.direction(), requested);
                }
            }
        }
    }

    #[test]
    fn head_wraps_around_every_edge() {
        let board = BoardSize::new(20, 10);
        let cases = [
            (CellCoord::new(19, 4), Direction::Right, CellCoord::new(0, 4)),
            (CellCoord::new(0, 4), Direction::Left, CellCoord::new(19, 4)),
            (CellCoord::new(6, 0), Direction::Up, CellCoord::new(6, 9)),
            (CellCoord::new(6, 9), Direction::Down, CellCoord::new(6, 0)),
        ];
        for (start, direction, expected) in cases {
            let mut snake = snake_on(board, 2);
            snake.head = start;
            snake.direction = direction;
            let (from, to) = snake.advance(board);
            assert_eq!(from, start);
            assert_eq!(to, expected);
        }
    }

    #[test]
    fn move_shifts_body_and_records_evicted_tail() {
        let board = BoardSize::new(20, 10);
        let mut snake = snake_on(board, 7);
        let _ = snake.advance(board);
        let body: Vec<_> = snake.body().collect();
        assert_eq!(snake.head(), CellCoord::new(11, 5));
        assert_eq!(body.len(), 7);
        assert_eq!(body[0], CellCoord::new(10, 5));
        assert_eq!(body[6], CellCoord::new(4, 5));
        assert_eq!(snake.last_tail(), CellCoord::new(3, 5));
    }

    #[test]
    fn growth_anchors_on_the_pre_move_tail() {
        let board = BoardSize::new(20, 10);
        let mut snake = snake_on(board, 7);
        let tail_before_move = snake.body().last().expect("tail");
        let _ = snake.advance(board);
        let tail_after_move = snake.body().last().expect("tail");
        snake.add_body(board);

        let grown = snake.body().last().expect("tail");
        assert_eq!(grown, tail_before_move.offset(Vector::new(-1, 0)));
        assert_ne!(grown, tail_after_move.offset(Vector::new(-1, 0)));
        assert_eq!(snake.body().count(), 8);
    }

    #[test]
    fn growth_offset_wraps_onto_the_board() {
        let board = BoardSize::new(5, 3);
        let mut snake = snake_on(board, 1);
        snake.last_tail = CellCoord::new(0, 2);
        snake.add_body(board);
        assert_eq!(snake.body().last(), Some(CellCoord::new(4, 2)));
    }

    #[test]
    fn folding_wraps_every_segment_onto_a_smaller_board() {
        let mut snake = snake_on(BoardSize::new(20, 10), 3);
        let smaller = BoardSize::new(8, 4);
        snake.fold_onto(smaller);
        assert_eq!(snake.head(), CellCoord::new(2, 1));
        let body: Vec<_> = snake.body().collect();
        assert_eq!(
            body,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(0, 1),
                CellCoord::new(7, 1)
            ]
        );
        assert_eq!(snake.last_tail(), CellCoord::new(7, 1));
    }

    #[test]
    fn feeding_adds_bonus_and_requested_segments() {
        let board = BoardSize::new(20, 10);
        let mut snake = snake_on(board, 7);
        snake.feed(10, 3, board);
        assert_eq!(snake.score(), 10);
        assert_eq!(snake.body().count(), 10);
    }

    #[test]
    fn footprint_lists_head_first() {
        let snake = snake_on(BoardSize::new(20, 10), 2);
        assert_eq!(
            snake.footprint(),
            vec![
                CellCoord::new(10, 5),
                CellCoord::new(9, 5),
                CellCoord::new(8, 5)
            ]
        );
    }
}
