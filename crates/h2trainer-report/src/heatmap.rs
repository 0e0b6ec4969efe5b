//! SVG heat-map of a dispersion snapshot.

use std::path::Path;

use anyhow::{Context, Result};

use h2trainer_sim::render::ColorField;
use h2trainer_sim::{DispersionParams, RoomLayout};

use crate::ensure_parent;

/// Pixel size of one grid cell.
pub const CELL_PX: usize = 10;
const CAPTION_PX: usize = 24;

/// Render `colors` as an SVG image, one `<rect>` per cell, with the leak and
/// vent marked and the parameters in a caption strip.
pub fn generate_heatmap_svg(colors: &ColorField, layout: &RoomLayout, params: &DispersionParams) -> String {
    let width = colors.nx() * CELL_PX;
    let height = colors.ny() * CELL_PX;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        width,
        height + CAPTION_PX
    );

    for (row, cells) in colors.rows().enumerate() {
        for (col, color) in cells.iter().enumerate() {
            svg.push_str(&format!(
                "  <rect x=\"{}\" y=\"{}\" width=\"{CELL_PX}\" height=\"{CELL_PX}\" fill=\"{}\"/>\n",
                col * CELL_PX,
                row * CELL_PX,
                color
            ));
        }
    }

    // Vent outline along the ceiling.
    let vent_end = layout.vent_span.end.min(colors.nx());
    let vent_start = layout.vent_span.start.min(vent_end);
    if vent_end > vent_start {
        svg.push_str(&format!(
            "  <rect class=\"vent\" x=\"{}\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#111\" stroke-width=\"2\"/>\n",
            vent_start * CELL_PX,
            (vent_end - vent_start) * CELL_PX,
            CELL_PX
        ));
    }

    let (leak_col, leak_row) = layout.leak_cell;
    svg.push_str(&format!(
        "  <circle class=\"leak\" cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"#111\" stroke-width=\"2\"/>\n",
        leak_col * CELL_PX + CELL_PX / 2,
        leak_row * CELL_PX + CELL_PX / 2,
        CELL_PX
    ));

    svg.push_str(&format!(
        "  <text x=\"4\" y=\"{}\" font-size=\"12\" font-family=\"monospace\" dominant-baseline=\"middle\">leak {:.2} | vent {:.2} | buoyancy {:.2} | diffusion {:.2}</text>\n",
        height + CAPTION_PX / 2,
        params.leak_rate,
        params.vent_strength,
        params.buoyancy,
        params.diffusion
    ));

    svg.push_str("</svg>\n");
    svg
}

/// Write the heat-map to a file.
pub fn write_heatmap_svg(
    colors: &ColorField,
    layout: &RoomLayout,
    params: &DispersionParams,
    path: &Path,
) -> Result<()> {
    let svg = generate_heatmap_svg(colors, layout, params);
    ensure_parent(path)?;
    std::fs::write(path, svg)
        .with_context(|| format!("failed to write heat-map to {}", path.display()))?;
    tracing::info!("heat-map written to {}", path.display());
    Ok(())
}
