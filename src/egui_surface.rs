use std::collections::HashMap;

use egui::{
    Align2, Color32, Context, FontId, Mesh, Painter, Pos2, Rect, Stroke, TextureHandle, TextureId,
    TextureOptions, Vec2, pos2,
};
use lyon::math::point;
use lyon::path::{FillRule, Path};
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};
use uuid::Uuid;

use crate::background::BackgroundImage;
use crate::element::FontSpec;
use crate::surface::{Surface, TextMeasurer};

/// Uploaded background textures, keyed by image id.
#[derive(Default)]
pub struct BackgroundTextures {
    handles: HashMap<Uuid, TextureHandle>,
}

impl BackgroundTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `image` on first use. Textures of other images are freed, as
    /// the document shows one background at a time.
    pub fn texture_for(&mut self, ctx: &Context, image: &BackgroundImage) -> TextureId {
        let id = image.id();
        self.handles.retain(|cached, _| *cached == id);
        self.handles
            .entry(id)
            .or_insert_with(|| {
                log::debug!("Uploading background texture {}", image.name());
                ctx.load_texture(
                    format!("background_{id}"),
                    image.pixels().clone(),
                    TextureOptions::LINEAR,
                )
            })
            .id()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl std::fmt::Debug for BackgroundTextures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundTextures")
            .field("cached", &self.handles.len())
            .finish()
    }
}

fn font_id(font: &FontSpec) -> FontId {
    // egui ships no bold face; weight only affects the stored descriptor
    FontId::proportional(font.size)
}

fn measure_with(ctx: &Context, text: &str, font: &FontSpec) -> f32 {
    ctx.fonts(|fonts| {
        fonts
            .layout_no_wrap(text.to_owned(), font_id(font), Color32::BLACK)
            .size()
            .x
    })
}

/// Measures text with egui's loaded fonts.
#[derive(Clone)]
pub struct EguiTextMeasurer {
    ctx: Context,
}

impl EguiTextMeasurer {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl TextMeasurer for EguiTextMeasurer {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        measure_with(&self.ctx, text, font)
    }
}

/// Triangulates the ring through `vertices` with the even-odd rule, so
/// concave rings fill exactly. `None` when the ring cannot be tessellated.
pub fn fill_mesh(vertices: &[Pos2], color: Color32) -> Option<Mesh> {
    let (first, rest) = vertices.split_first()?;
    let mut builder = Path::builder();
    builder.begin(point(first.x, first.y));
    for p in rest {
        builder.line_to(point(p.x, p.y));
    }
    builder.close();
    let path = builder.build();

    let mut buffers: VertexBuffers<Pos2, u32> = VertexBuffers::new();
    let options = FillOptions::default().with_fill_rule(FillRule::EvenOdd);
    FillTessellator::new()
        .tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex<'_>| {
                let position = vertex.position();
                pos2(position.x, position.y)
            }),
        )
        .inspect_err(|err| log::warn!("Cannot tessellate polygon fill: {err:?}"))
        .ok()?;

    let mut mesh = Mesh::default();
    for position in buffers.vertices {
        mesh.colored_vertex(position, color);
    }
    mesh.indices = buffers.indices;
    Some(mesh)
}

/// Surface over an egui painter covering the canvas rect.
pub struct EguiSurface<'a> {
    painter: &'a Painter,
    canvas: Rect,
    canvas_color: Color32,
    textures: &'a mut BackgroundTextures,
}

impl<'a> EguiSurface<'a> {
    pub fn new(
        painter: &'a Painter,
        canvas: Rect,
        canvas_color: Color32,
        textures: &'a mut BackgroundTextures,
    ) -> Self {
        Self {
            painter,
            canvas,
            canvas_color,
            textures,
        }
    }

    fn to_screen(&self, pos: Pos2) -> Pos2 {
        pos + self.canvas.min.to_vec2()
    }

    fn to_screen_all(&self, points: &[Pos2]) -> Vec<Pos2> {
        points.iter().map(|p| self.to_screen(*p)).collect()
    }
}

impl TextMeasurer for EguiSurface<'_> {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        measure_with(self.painter.ctx(), text, font)
    }
}

impl Surface for EguiSurface<'_> {
    fn size(&self) -> Vec2 {
        self.canvas.size()
    }

    fn clear(&mut self) {
        self.painter.rect_filled(self.canvas, 0.0, self.canvas_color);
    }

    fn draw_image(&mut self, image: &BackgroundImage, rect: Rect) {
        let texture = self.textures.texture_for(self.painter.ctx(), image);
        let screen_rect = rect.translate(self.canvas.min.to_vec2());
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        self.painter.image(texture, screen_rect, uv, Color32::WHITE);
    }

    fn draw_polygon(&mut self, points: &[Pos2], fill: Option<Color32>, stroke: Stroke) {
        let points = self.to_screen_all(points);
        if let Some(mesh) = fill.and_then(|fill| fill_mesh(&points, fill)) {
            self.painter.add(egui::Shape::mesh(mesh));
        }
        self.painter.add(egui::Shape::closed_line(points, stroke));
    }

    fn draw_circle(&mut self, center: Pos2, radius: f32, fill: Option<Color32>, stroke: Stroke) {
        let center = self.to_screen(center);
        match fill {
            Some(fill) => self.painter.circle(center, radius, fill, stroke),
            None => self.painter.circle_stroke(center, radius, stroke),
        };
    }

    fn draw_polyline(&mut self, points: &[Pos2], stroke: Stroke) {
        let points = self.to_screen_all(points);
        self.painter.add(egui::Shape::line(points, stroke));
    }

    fn draw_text(&mut self, pos: Pos2, text: &str, font: &FontSpec, color: Color32) {
        self.painter.text(
            self.to_screen(pos),
            Align2::LEFT_BOTTOM,
            text,
            font_id(font),
            color,
        );
    }
}
