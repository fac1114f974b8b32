use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::FontsConfig;
use crate::foundation::error::{TextBehindError, TextBehindResult};

/// A resolved font face: the bytes plus the face index inside them.
#[derive(Clone)]
pub struct FontFace {
    /// Family name as reported by the font itself.
    pub family: String,
    /// Face index inside a collection file.
    pub index: u32,
    data: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FontFace {
    /// Raw font file bytes.
    pub fn bytes(&self) -> &[u8] {
        self.data.as_slice()
    }
}

/// Font lookup by family name with a fallback chain.
///
/// Resolution order: requested family, the configured fallback family, the database's generic
/// sans-serif family, then any loaded face. Only an empty library yields `None`.
pub struct FontLibrary {
    db: fontdb::Database,
    fallback_family: String,
    resolved: Mutex<HashMap<String, Option<Arc<FontFace>>>>,
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.db.len())
            .field("fallback_family", &self.fallback_family)
            .finish()
    }
}

impl FontLibrary {
    /// Build a library from configuration, scanning system and extra directories.
    pub fn new(cfg: &FontsConfig) -> Self {
        let mut db = fontdb::Database::new();
        if cfg.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &cfg.font_dirs {
            db.load_fonts_dir(dir);
        }
        tracing::debug!(faces = db.len(), "font library loaded");
        Self::from_database(db, cfg.fallback_family.clone())
    }

    /// Library holding only the given font file contents.
    pub fn from_font_bytes(
        fonts: impl IntoIterator<Item = Vec<u8>>,
        fallback_family: impl Into<String>,
    ) -> Self {
        let mut db = fontdb::Database::new();
        for bytes in fonts {
            db.load_font_data(bytes);
        }
        Self::from_database(db, fallback_family.into())
    }

    fn from_database(db: fontdb::Database, fallback_family: String) -> Self {
        Self {
            db,
            fallback_family,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// Number of loaded faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Resolve `family`, falling back when it is not installed.
    pub fn resolve(&self, family: &str) -> Option<Arc<FontFace>> {
        let key = family.trim().to_ascii_lowercase();
        {
            let cache = self.resolved.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = cache.get(&key) {
                return hit.clone();
            }
        }

        let id = self.lookup(family.trim()).or_else(|| {
            tracing::warn!(
                requested = family,
                fallback = %self.fallback_family,
                "font family unavailable, using fallback"
            );
            self.lookup(&self.fallback_family)
                .or_else(|| self.query(&[fontdb::Family::SansSerif]))
                .or_else(|| self.db.faces().next().map(|f| f.id))
        });
        let face = id.and_then(|id| self.load(id)).map(Arc::new);
        if face.is_none() {
            tracing::warn!(requested = family, "no fonts available; text will not be drawn");
        }

        let mut cache = self.resolved.lock().unwrap_or_else(|e| e.into_inner());
        cache.insert(key, face.clone());
        face
    }

    fn lookup(&self, family: &str) -> Option<fontdb::ID> {
        if family.is_empty() {
            return None;
        }
        self.query(&[fontdb::Family::Name(family)]).or_else(|| {
            self.db
                .faces()
                .find(|f| f.families.iter().any(|(n, _)| n.eq_ignore_ascii_case(family)))
                .map(|f| f.id)
        })
    }

    fn query(&self, families: &[fontdb::Family<'_>]) -> Option<fontdb::ID> {
        let query = fontdb::Query {
            families,
            ..fontdb::Query::default()
        };
        self.db.query(&query)
    }

    fn load(&self, id: fontdb::ID) -> Option<FontFace> {
        let family = self
            .db
            .face(id)
            .and_then(|f| f.families.first().map(|(n, _)| n.clone()))?;
        self.db.with_face_data(id, |data, index| FontFace {
            family,
            index,
            data: Arc::new(data.to_vec()),
        })
    }
}

/// Unit brush: glyphs are rasterized as coverage and colored afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct CoverageBrush;

/// Key of a font inside parley's shaping output: blob id and face index.
pub(crate) type RunFontKey = (u64, u32);

/// A laid-out single text block plus the fonts needed to rasterize it.
pub(crate) struct ShapedText {
    pub(crate) layout: parley::Layout<CoverageBrush>,
    /// Requested face.
    pub(crate) font: vello_cpu::peniko::FontData,
    /// Rasterizer fonts for every face the runs were shaped with, including fallbacks.
    pub(crate) run_fonts: HashMap<RunFontKey, vello_cpu::peniko::FontData>,
}

impl ShapedText {
    /// Advance width of the widest line.
    pub(crate) fn width(&self) -> f32 {
        self.layout.width()
    }

    /// Total height of all line boxes.
    pub(crate) fn height(&self) -> f32 {
        self.layout.height()
    }

    /// Font to draw `run` with: the face it was shaped with, else the requested face.
    pub(crate) fn font_for(
        &self,
        run: &parley::layout::Run<'_, CoverageBrush>,
    ) -> &vello_cpu::peniko::FontData {
        let font = run.font();
        self.run_fonts
            .get(&(font.data.id(), font.index))
            .unwrap_or(&self.font)
    }
}

/// Stateful helper for building Parley layouts from resolved faces.
///
/// Holds mutable shaping caches, so each render owns its own engine.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<CoverageBrush>,
    registered: HashMap<(String, u32), (String, vello_cpu::peniko::FontData)>,
    run_fonts: HashMap<RunFontKey, vello_cpu::peniko::FontData>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
            run_fonts: HashMap::new(),
        }
    }

    fn register(&mut self, face: &FontFace) -> TextBehindResult<(String, vello_cpu::peniko::FontData)> {
        let key = (face.family.clone(), face.index);
        if let Some(hit) = self.registered.get(&key) {
            return Ok(hit.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes().to_vec()), None);
        let mut names = Vec::with_capacity(families.len());
        for (id, _) in &families {
            if let Some(name) = self.font_ctx.collection.family_name(*id) {
                names.push(name.to_string());
            }
        }
        let family_name = names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(&face.family))
            .or_else(|| names.first())
            .cloned()
            .ok_or_else(|| TextBehindError::validation("registered font has no family name"))?;

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes().to_vec()),
            face.index,
        );
        self.registered
            .insert(key, (family_name.clone(), font.clone()));
        Ok((family_name, font))
    }

    /// Shape `text` on one unbounded line.
    ///
    /// Whitespace controls (`\n`, `\r`, `\t`, form feed) are drawn as plain spaces, as a canvas
    /// `fillText` call does, so the whole text stays a single centered run.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
    ) -> TextBehindResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TextBehindError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let (family_name, font) = self.register(face)?;
        let line = single_line(text);
        let text: &str = &line;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Single(parley::style::FontFamily::Named(Cow::Owned(
                family_name,
            ))),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<CoverageBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let run_fonts = self.collect_run_fonts(&layout);
        Ok(ShapedText {
            layout,
            font,
            run_fonts,
        })
    }

    /// Rasterizer fonts for the faces parley picked, converted once per engine.
    fn collect_run_fonts(
        &mut self,
        layout: &parley::Layout<CoverageBrush>,
    ) -> HashMap<RunFontKey, vello_cpu::peniko::FontData> {
        let mut out = HashMap::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let font = run.run().font();
                let key = (font.data.id(), font.index);
                if out.contains_key(&key) {
                    continue;
                }
                let converted = self
                    .run_fonts
                    .entry(key)
                    .or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(
                            vello_cpu::peniko::Blob::from(font.data.data().to_vec()),
                            font.index,
                        )
                    })
                    .clone();
                out.insert(key, converted);
            }
        }
        out
    }
}

fn single_line(text: &str) -> Cow<'_, str> {
    const BREAKS: [char; 4] = ['\n', '\r', '\t', '\u{c}'];
    if text.contains(BREAKS) {
        Cow::Owned(text.replace(BREAKS, " "))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
