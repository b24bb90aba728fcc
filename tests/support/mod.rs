// Copyright (c) 2026 paneterm contributors. Licensed under Apache License, Version 2.0.

//! Shared fixtures for the integration tests: a minimal `PaneContext` and
//! `GridSource` pair, playing the role a real pane/window tree plays in
//! the host application.

use paneterm::{CellData, DefaultColours, GridCell, GridSource, PaneContext};

pub struct TestPane {
    pub xoff: u32,
    pub yoff: u32,
    pub sx: u32,
    pub sy: u32,
    pub defaults: DefaultColours,
    pub redraw_requests: Vec<(u32, u32)>,
}

impl TestPane {
    pub fn new(sx: u32, sy: u32) -> Self {
        Self { xoff: 0, yoff: 0, sx, sy, defaults: DefaultColours::default(), redraw_requests: Vec::new() }
    }
}

impl PaneContext for TestPane {
    fn xoff(&self) -> u32 {
        self.xoff
    }
    fn yoff(&self) -> u32 {
        self.yoff
    }
    fn sx(&self) -> u32 {
        self.sx
    }
    fn sy(&self) -> u32 {
        self.sy
    }
    fn default_colours(&self) -> DefaultColours {
        self.defaults
    }
    fn request_redraw(&mut self, rupper: u32, rlower: u32) {
        self.redraw_requests.push((rupper, rlower));
    }
}

#[derive(Default)]
pub struct TestSource {
    pub rows: Vec<Vec<GridCell<'static>>>,
}

impl TestSource {
    pub fn blank(width: u32, height: u32) -> Self {
        let row: Vec<GridCell<'static>> = (0..width).map(|_| GridCell::blank()).collect();
        Self { rows: vec![row; height as usize] }
    }
}

impl GridSource for TestSource {
    fn row_len(&self, py: u32) -> u32 {
        self.rows[py as usize].len() as u32
    }
    fn cell(&self, x: u32, py: u32) -> GridCell<'_> {
        self.rows[py as usize][x as usize]
    }
    fn previous_line_wrapped(&self, _py: u32) -> bool {
        false
    }
}

#[allow(dead_code)]
pub fn ascii_cell(byte: u8) -> GridCell<'static> {
    GridCell { data: CellData::Ascii(byte), ..GridCell::blank() }
}
