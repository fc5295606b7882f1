use eframe::egui::{Vec2, vec2};

use crate::graph::EdgeKind;
use crate::interaction::ViewTransform;
use crate::util::escape_xml;

use super::style::{self, hex};
use super::{ARROW_LENGTH, Glyph, Scene, SceneNode};

fn points_attr(points: &[Vec2]) -> String {
    points
        .iter()
        .map(|point| format!("{:.2},{:.2}", point.x, point.y))
        .collect::<Vec<_>>()
        .join(" ")
}

// Strokes and marks are in screen pixels; the enclosing group scales by `zoom`.
fn glyph_svg(node: &SceneNode, zoom: f32) -> String {
    let center = node.center;
    let half = node.glyph.half_size();
    let fill = hex(style::glyph_fill(node.glyph));
    let (stroke_color, stroke_width) = style::node_stroke(node.selected, node.search_hit);
    let stroke = format!(
        "fill=\"{fill}\" stroke=\"{}\" stroke-width=\"{:.2}\"",
        hex(stroke_color),
        stroke_width / zoom
    );

    match node.glyph {
        Glyph::Diamond => format!(
            "<polygon points=\"{}\" {stroke}/>",
            points_attr(&[
                center - vec2(0.0, half.y),
                center + vec2(half.x, 0.0),
                center + vec2(0.0, half.y),
                center - vec2(half.x, 0.0),
            ])
        ),
        Glyph::Ellipse => format!(
            "<ellipse cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\" {stroke}/>",
            center.x, center.y, half.x, half.y
        ),
        Glyph::RoundedRect | Glyph::Neutral => {
            let corner = if node.glyph == Glyph::RoundedRect {
                style::ROUNDED_CORNER
            } else {
                0.0
            };
            format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{corner:.2}\" {stroke}/>",
                center.x - half.x,
                center.y - half.y,
                half.x * 2.0,
                half.y * 2.0
            )
        }
    }
}

fn label_svg(node: &SceneNode, zoom: f32) -> String {
    let mut text = String::new();
    if !node.label.is_empty() && style::text_visible(style::LABEL_SIZE, zoom) {
        text.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{:.1}\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\">",
            node.center.x,
            node.center.y,
            style::LABEL_SIZE,
            hex(style::LABEL_TEXT)
        ));
        for span in &node.label {
            if span.matched {
                text.push_str(&format!(
                    "<tspan class=\"match\" font-weight=\"bold\" fill=\"{}\">{}</tspan>",
                    hex(style::SEARCH_STROKE),
                    escape_xml(&span.text)
                ));
            } else {
                text.push_str(&format!("<tspan>{}</tspan>", escape_xml(&span.text)));
            }
        }
        text.push_str("</text>");
    }

    if let Some(notes) = &node.notes
        && style::text_visible(style::NOTES_SIZE, zoom)
    {
        let below = node.center.y + node.glyph.half_size().y + style::NOTES_GAP;
        text.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{:.1}\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"hanging\">{}</text>",
            node.center.x,
            below,
            style::NOTES_SIZE,
            hex(style::NOTES_TEXT),
            escape_xml(notes)
        ));
    }
    text
}

pub fn render_svg(scene: &Scene, view: &ViewTransform, size: Vec2) -> String {
    let width = size.x.max(1.0);
    let height = size.y.max(1.0);
    let origin = vec2(width * 0.5, height * 0.5) + view.pan();
    let zoom = view.zoom();

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\" font-family=\"sans-serif\">"
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        hex(style::BACKGROUND)
    ));
    svg.push_str(&format!(
        "<g transform=\"translate({:.2} {:.2}) scale({:.4})\">",
        origin.x,
        origin.y,
        zoom
    ));

    svg.push_str("<g class=\"edges\">");
    for edge in scene.edges() {
        let color = match edge.kind {
            EdgeKind::Partner => style::PARTNER_EDGE,
            EdgeKind::Child => style::CHILD_EDGE,
        };
        let end = match edge.arrow {
            // Stop the line at the arrow base so the tip stays sharp.
            Some([tip, _, _]) => {
                let direction = (tip - edge.from).normalized();
                tip - direction * ARROW_LENGTH
            }
            None => edge.to,
        };
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{:.2}\"/>",
            edge.from.x,
            edge.from.y,
            end.x,
            end.y,
            hex(color),
            style::edge_screen_width(zoom) / zoom
        ));
        if let Some(arrow) = edge.arrow {
            svg.push_str(&format!(
                "<polygon points=\"{}\" fill=\"{}\"/>",
                points_attr(&arrow),
                hex(color)
            ));
        }
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for node in scene.nodes() {
        svg.push_str(&format!(
            "<g data-id=\"{}\">",
            escape_xml(&node.key.to_string())
        ));
        svg.push_str(&glyph_svg(node, zoom));
        if node.pinned {
            let half = node.glyph.half_size();
            svg.push_str(&format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/>",
                node.center.x + half.x * 0.7,
                node.center.y - half.y * 0.7,
                style::PIN_MARK_RADIUS / zoom,
                hex(style::PIN_MARK)
            ));
        }
        svg.push_str(&label_svg(node, zoom));
        svg.push_str("</g>");
    }
    svg.push_str("</g>");

    svg.push_str("</g></svg>\n");
    svg
}
