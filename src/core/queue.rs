//! Queue module - hold slot, current piece and the preview ring.
//!
//! The queue owns every piece instance for the whole game. The current piece
//! and the N previews live in a fixed ring of `1 + N` reusable slots with a
//! head index: promoting the next piece is "reset the locked slot in place
//! with a freshly drawn kind, advance the head". No allocation happens after
//! construction and piece identity persists across spawns.

use arrayvec::ArrayVec;

use crate::core::{Bag, Piece};
use crate::types::{PieceKind, MAX_LOOKAHEAD};

/// Ordered piece storage: hold + current + lookahead previews.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Ring of current + previews, `slots[head]` is the falling piece.
    slots: Vec<Piece>,
    head: usize,
    hold: Piece,
    /// The hold slot is empty-semantically until the first hold.
    hold_filled: bool,
    bag: Bag,
    board_width: u8,
}

impl PieceQueue {
    /// Create a queue with `lookahead` previews, drawing the opening pieces.
    pub fn new(lookahead: usize, board_width: u8, seed: u32) -> Self {
        let lookahead = lookahead.min(MAX_LOOKAHEAD);
        let mut queue = Self {
            slots: Vec::with_capacity(1 + lookahead),
            head: 0,
            hold: Piece::new(PieceKind::O, board_width),
            hold_filled: false,
            bag: Bag::new(seed),
            board_width,
        };
        for _ in 0..1 + lookahead {
            let kind = queue.draw_kind();
            queue.slots.push(Piece::new(kind, board_width));
        }
        queue
    }

    /// Draw from the bag, refilling at most once per 7 draws.
    fn draw_kind(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.bag.refill();
        }
        self.bag.draw()
    }

    /// The falling piece.
    pub fn current(&self) -> &Piece {
        &self.slots[self.head]
    }

    pub fn current_mut(&mut self) -> &mut Piece {
        &mut self.slots[self.head]
    }

    /// Recycle the just-locked current slot and promote the next piece.
    ///
    /// The vacated slot is reset in place with a freshly drawn kind and
    /// becomes the tail of the preview order.
    pub fn advance(&mut self) {
        let kind = self.draw_kind();
        let width = self.board_width;
        self.slots[self.head].spawn(kind, width);
        self.head = (self.head + 1) % self.slots.len();
    }

    /// Exchange the current piece with the hold slot.
    ///
    /// Allowed at most once per piece-life; the incoming piece is reset to
    /// spawn defaults. Returns false (queue unchanged) when hold was already
    /// used this piece-life.
    pub fn swap_hold(&mut self) -> bool {
        if self.current().held {
            return false;
        }

        let width = self.board_width;
        let outgoing = self.current().kind;
        if self.hold_filled {
            let incoming = self.hold.kind;
            self.hold.spawn(outgoing, width);
            let current = &mut self.slots[self.head];
            current.spawn(incoming, width);
            current.held = true;
        } else {
            self.hold.spawn(outgoing, width);
            self.hold_filled = true;
            self.advance();
            self.slots[self.head].held = true;
        }
        true
    }

    /// Kind parked in the hold slot, if the player has held once.
    pub fn hold_kind(&self) -> Option<PieceKind> {
        self.hold_filled.then_some(self.hold.kind)
    }

    /// Upcoming kinds in spawn order (excludes the current piece).
    pub fn next_kinds(&self) -> ArrayVec<PieceKind, MAX_LOOKAHEAD> {
        let len = self.slots.len();
        (1..len)
            .map(|i| self.slots[(self.head + i) % len].kind)
            .collect()
    }

    pub fn lookahead(&self) -> usize {
        self.slots.len() - 1
    }
}
