//! SVG export of space-time diagrams.
//!
//! Each cell is drawn as a square, time flowing downwards. Several diagrams
//! are laid out left to right separated by a two-cell gap.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::compute::SpaceTimeDiagram;
use crate::schema::{Alphabet, GENERAL, REST, State};

/// Fill colours of the intermediate states, in state order.
const INTERMEDIATE_COLORS: [&str; 4] = ["yellow", "green", "violet", "orange"];

/// Colour scheme for cell fills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Palette {
    /// FIRE drawn red.
    #[default]
    Color,
    /// FIRE drawn black, for print.
    Monochrome,
}

/// Writes diagrams as SVG documents.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    alphabet: Alphabet,
    palette: Palette,
    cell_size: u32,
}

impl SvgRenderer {
    /// Renderer with 10 px cells and the colour palette.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            palette: Palette::default(),
            cell_size: 10,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size.max(1);
        self
    }

    /// Fill colour of a state. Sentinels and unknown states are grey.
    pub fn fill(&self, state: State) -> &'static str {
        let fire = self.alphabet.fire();
        match state {
            REST => "white",
            GENERAL => "blue",
            s if s == fire => match self.palette {
                Palette::Color => "red",
                Palette::Monochrome => "black",
            },
            s if s < fire => INTERMEDIATE_COLORS
                .get(usize::from(s - GENERAL - 1))
                .copied()
                .unwrap_or("grey"),
            _ => "grey",
        }
    }

    /// Canvas size in pixels.
    ///
    /// `2N` cells high for a largest size `N`. One diagram takes `N + 1` cells
    /// of width; the sizes `2..=N` side by side take `N(N+1)/2 + 2(N-1)`.
    pub fn canvas(&self, diagrams: &[SpaceTimeDiagram]) -> (u32, u32) {
        let n = diagrams.iter().map(|d| d.size).max().unwrap_or(0);
        if n == 0 {
            return (0, 0);
        }
        let columns = if diagrams.len() == 1 {
            n + 1
        } else {
            n * (n + 1) / 2 + 2 * (n - 1)
        };
        (columns as u32 * self.cell_size, (2 * n) as u32 * self.cell_size)
    }

    /// Write one SVG document holding every diagram.
    pub fn write_svg<W: Write>(&self, diagrams: &[SpaceTimeDiagram], w: &mut W) -> io::Result<()> {
        let (width, height) = self.canvas(diagrams);
        writeln!(w, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        writeln!(
            w,
            r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.0//EN" "http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd">"#
        )?;
        writeln!(w)?;
        writeln!(w, "<svg")?;
        writeln!(w, r#"xmlns="http://www.w3.org/2000/svg""#)?;
        writeln!(w, r#"xmlns:xlink="http://www.w3.org/1999/xlink""#)?;
        writeln!(w, r#"xmlns:ev="http://www.w3.org/2001/xml-events""#)?;
        writeln!(w, r#"version="1.1""#)?;
        writeln!(w, r#"baseProfile="full""#)?;
        writeln!(w, r#"width="{width}" height="{height}">"#)?;
        writeln!(w, r#"<g stroke-width="1px" stroke="black" fill="white">"#)?;

        let cell = self.cell_size as usize;
        let mut x = 0;
        for diagram in diagrams {
            for (t, row) in diagram.rows.iter().enumerate() {
                for (i, &state) in row.iter().enumerate() {
                    writeln!(
                        w,
                        r#"<rect width="{cell}" height="{cell}" x="{}" y="{}" fill="{}"/>"#,
                        x + (i + 1) * cell,
                        (t + 1) * cell,
                        self.fill(state)
                    )?;
                }
            }
            x += (diagram.size + 2) * cell;
        }

        writeln!(w, "</g>")?;
        writeln!(w, "</svg>")
    }

    /// Write the diagrams to an SVG file.
    pub fn save<P: AsRef<Path>>(&self, diagrams: &[SpaceTimeDiagram], path: P) -> io::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write_svg(diagrams, &mut file)?;
        file.flush()
    }
}
