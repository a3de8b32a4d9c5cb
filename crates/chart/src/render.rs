//! SVG output for a [`ChartFrame`].

use foundation::math::{Vec2, ViewTransform};
use layers::{LabelEntry, LayerGroup, Overlay, RenderedSymbol, Symbol};
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Ellipse, Group, Path, Rectangle, Text};

use crate::controller::ChartController;
use crate::frame::ChartFrame;

fn group_with_class(class: &str) -> Group {
    Group::new().set("class", class)
}

fn runs_data(runs: &[Vec<Vec2>]) -> Option<Data> {
    let mut data = Data::new();
    let mut any = false;
    for run in runs.iter().filter(|r| r.len() >= 2) {
        data = data.move_to((run[0].x, run[0].y));
        for p in &run[1..] {
            data = data.line_to((p.x, p.y));
        }
        any = true;
    }
    any.then_some(data)
}

fn cross_data(center: Vec2, arm: f64) -> Data {
    Data::new()
        .move_to((center.x - arm, center.y))
        .line_to((center.x + arm, center.y))
        .move_to((center.x, center.y - arm))
        .line_to((center.x, center.y + arm))
}

fn overlay_node(g: Group, overlay: &Overlay) -> Group {
    let class = overlay.class_name();
    match overlay {
        Overlay::Globe { center, r } => g.add(
            Circle::new()
                .set("class", class)
                .set("fill", "none")
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", *r),
        ),
        Overlay::Graticule { runs, .. } | Overlay::Ecliptic { runs } => match runs_data(runs) {
            Some(d) => g.add(Path::new().set("class", class).set("fill", "none").set("d", d)),
            None => g,
        },
        Overlay::Zenith { center, arm } => g.add(
            Path::new()
                .set("class", class)
                .set("fill", "none")
                .set("d", cross_data(*center, *arm)),
        ),
        Overlay::Compass { text, at } => g.add(
            Text::new(*text)
                .set("class", class)
                .set("x", at.x)
                .set("y", at.y)
                .set("text-anchor", "middle"),
        ),
    }
}

fn symbol_node(g: Group, rendered: &RenderedSymbol) -> Group {
    let class = rendered.object_type.class_name();
    let id = rendered.id.as_str();
    match &rendered.symbol {
        Symbol::Disk { center, r } => g.add(
            Circle::new()
                .set("class", class)
                .set("data-id", id)
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", *r),
        ),
        Symbol::Ellipse {
            center,
            rx,
            ry,
            angle,
        } => g.add(
            Ellipse::new()
                .set("class", class)
                .set("data-id", id)
                .set("cx", center.x)
                .set("cy", center.y)
                .set("rx", *rx)
                .set("ry", *ry)
                .set(
                    "transform",
                    format!("rotate({},{},{})", angle, center.x, center.y),
                ),
        ),
        Symbol::Circle { center, r, dashed } => {
            let mut circle = Circle::new()
                .set("class", class)
                .set("data-id", id)
                .set("fill", "none")
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", *r);
            if *dashed {
                circle = circle.set("stroke-dasharray", "2,2");
            }
            g.add(circle)
        }
        Symbol::CrossedCircle { center, r, arm } => g.add(
            Group::new()
                .set("class", class)
                .set("data-id", id)
                .add(
                    Circle::new()
                        .set("fill", "none")
                        .set("cx", center.x)
                        .set("cy", center.y)
                        .set("r", *r),
                )
                .add(Path::new().set("fill", "none").set("d", cross_data(*center, *arm))),
        ),
        Symbol::Square { corner, side } => g.add(
            Rectangle::new()
                .set("class", class)
                .set("data-id", id)
                .set("fill", "none")
                .set("x", corner.x)
                .set("y", corner.y)
                .set("width", *side)
                .set("height", *side),
        ),
        Symbol::Polyline { runs } => match runs_data(runs) {
            Some(d) => g.add(
                Path::new()
                    .set("class", class)
                    .set("data-id", id)
                    .set("fill", "none")
                    .set("d", d),
            ),
            None => g,
        },
    }
}

fn label_node(g: Group, label: &LabelEntry) -> Group {
    g.add(
        Text::new(label.text.as_str())
            .set("class", format!("label {}", label.object_type.class_name()))
            .set("data-anchor", label.anchor_id.as_str())
            .set("x", label.x)
            .set("y", label.y)
            .set("text-anchor", label.side.text_anchor()),
    )
}

/// Builds the document: one group per layer in paint order, all inside a
/// view group carrying the pan/zoom transform.
pub fn render_document(
    frame: &ChartFrame,
    view: &ViewTransform,
    labels: &[&LabelEntry],
) -> Document {
    let mut view_group = group_with_class("chart").set("transform", view.to_css());
    for group in LayerGroup::ALL {
        let mut g = group_with_class(group.class_name());
        match group {
            LayerGroup::Lines => {
                for overlay in &frame.overlays {
                    g = overlay_node(g, overlay);
                }
            }
            LayerGroup::Labels => {
                for label in labels {
                    g = label_node(g, label);
                }
            }
            _ => {
                for symbol in frame.symbols_in(group) {
                    g = symbol_node(g, symbol);
                }
            }
        }
        view_group = view_group.add(g);
    }

    let (w, h) = (frame.viewport.width, frame.viewport.height);
    Document::new()
        .set("viewBox", (0.0, 0.0, w, h))
        .set("width", w)
        .set("height", h)
        .add(view_group)
}

impl ChartController {
    /// The current chart, including pan/zoom and hovered labels.
    pub fn to_svg(&self) -> String {
        render_document(self.frame(), &self.view(), &self.visible_labels()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formats::ObjectType;
    use foundation::math::{CelestialPoint, Rotation, Viewport};
    use layers::LabelSide;
    use runtime::Generation;

    fn frame() -> ChartFrame {
        let mut frame = ChartFrame::new(
            Generation(1),
            Viewport::new(200.0, 100.0),
            CelestialPoint::new(0.0, 0.0),
            Rotation::default(),
        );
        frame.overlays.push(Overlay::Globe {
            center: Vec2::new(100.0, 50.0),
            r: 100.0,
        });
        frame.push_symbols(
            LayerGroup::Objects,
            vec![RenderedSymbol {
                id: "NGC7293".to_string(),
                object_type: ObjectType::PlanetaryNebula,
                symbol: Symbol::CrossedCircle {
                    center: Vec2::new(10.0, 10.0),
                    r: 3.0,
                    arm: 6.0,
                },
            }],
        );
        frame.push_symbols(
            LayerGroup::Stars,
            vec![RenderedSymbol {
                id: "HIP1".to_string(),
                object_type: ObjectType::Star,
                symbol: Symbol::Disk {
                    center: Vec2::new(20.0, 30.0),
                    r: 2.5,
                },
            }],
        );
        frame
    }

    fn label(text: &str) -> LabelEntry {
        LabelEntry {
            anchor_id: "HIP1".to_string(),
            object_type: ObjectType::Star,
            x: 20.0,
            y: 25.0,
            text: text.to_string(),
            side: LabelSide::Right,
            hover_only: false,
        }
    }

    #[test]
    fn groups_follow_paint_order() {
        let out = render_document(&frame(), &ViewTransform::identity(), &[]).to_string();
        let positions: Vec<usize> = LayerGroup::ALL
            .iter()
            .map(|g| {
                out.find(&format!("class=\"{}\"", g.class_name()))
                    .unwrap_or_else(|| panic!("missing group {g:?}"))
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert!(out.contains("viewBox=\"0 0 200 100\""));
    }

    #[test]
    fn view_transform_wraps_layers() {
        let mut view = ViewTransform::identity();
        view.pan_by(Vec2::new(10.0, -4.0));
        let out = render_document(&frame(), &view, &[]).to_string();
        assert!(out.contains("transform=\"translate(10,-4) scale(1)\""));
    }

    #[test]
    fn symbols_and_labels_are_written() {
        let vega = label("Vega");
        let out = render_document(&frame(), &ViewTransform::identity(), &[&vega]).to_string();
        assert!(out.contains("data-id=\"HIP1\""));
        assert!(out.contains("r=\"2.5\""));
        assert!(out.contains("class=\"planetary-nebula\""));
        assert!(out.contains("<path"), "{out}");
        assert!(out.contains("\nVega\n</text>"), "{out}");
        assert!(out.contains("text-anchor=\"start\""));
    }
}
