//! [`SignModel`] owns the configuration and the last rendered blueprint.
//!
//! Mutators never touch the GPU. Each one updates a single field, drops the
//! rendered sign and hands back a [`RebuildRequest`] for the caller to load
//! the wood for. The finished load comes back through [`SignModel::accept`],
//! which only honours the newest request.

use std::{collections::HashMap, sync::Arc};

use image::RgbaImage;
use log::{debug, error, info};

use crate::{
    error::SignError,
    resources::texture::fit_to_limit,
    settings::Settings,
    sign::{
        blueprint::{SignBlueprint, build_blueprint},
        config::{SignConfiguration, SignSize, SignText, WoodTexture},
        rebuild::{RebuildCompletion, RebuildGuard, RebuildRequest},
        typeset::Typesetter,
    },
};

enum Font {
    Pending,
    Ready(Box<dyn Typesetter>),
    Failed,
}

pub struct SignModel {
    config: SignConfiguration,
    guard: RebuildGuard,
    font: Font,
    // A current completion that arrived before the font did.
    parked: Option<RebuildCompletion>,
    rendered: Option<SignBlueprint>,
    wood_cache: HashMap<WoodTexture, Arc<RgbaImage>>,
    base_scale: f32,
    magnification: u32,
    max_texture_side: u32,
}

impl Default for SignModel {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl SignModel {
    pub fn new(settings: &Settings) -> Self {
        Self {
            config: settings.initial.clone(),
            guard: RebuildGuard::default(),
            font: Font::Pending,
            parked: None,
            rendered: None,
            wood_cache: HashMap::new(),
            base_scale: settings.base_scale,
            magnification: settings.magnification,
            max_texture_side: settings.max_texture_side,
        }
    }

    pub fn config(&self) -> &SignConfiguration {
        &self.config
    }

    /// The sign currently on screen, if any.
    pub fn rendered(&self) -> Option<&SignBlueprint> {
        self.rendered.as_ref()
    }

    pub fn set_text(&mut self, text: SignText) -> RebuildRequest {
        self.config.text = text;
        self.request_rebuild()
    }

    pub fn set_wood_texture(&mut self, wood: WoodTexture) -> RebuildRequest {
        self.config.wood = wood;
        self.request_rebuild()
    }

    pub fn set_size(&mut self, size: SignSize) -> RebuildRequest {
        self.config.size = size;
        self.request_rebuild()
    }

    pub fn toggle_pole(&mut self) -> RebuildRequest {
        self.config.show_pole = !self.config.show_pole;
        self.request_rebuild()
    }

    /// Drop the rendered sign and stamp the current configuration with a new
    /// token. Every earlier request becomes stale.
    pub fn request_rebuild(&mut self) -> RebuildRequest {
        self.rendered = None;
        self.parked = None;
        let token = self.guard.issue();
        debug!(
            "Rebuild {} requested ({} wood, {} size, pole {})",
            token.generation(),
            self.config.wood,
            self.config.size,
            if self.config.show_pole { "on" } else { "off" },
        );
        RebuildRequest {
            token,
            config: self.config.clone(),
        }
    }

    pub fn cached_wood(&self, wood: WoodTexture) -> Option<Arc<RgbaImage>> {
        self.wood_cache.get(&wood).cloned()
    }

    /// Finish a rebuild with its loaded wood image.
    ///
    /// Stale completions are dropped and yield `Ok(None)`, as does a current
    /// one that has to wait for the font. A failed load or an empty image
    /// leaves the sign discarded. Wood larger than the texture limit is
    /// scaled down before it is cached.
    pub fn accept(
        &mut self,
        completion: RebuildCompletion,
    ) -> Result<Option<&SignBlueprint>, SignError> {
        let RebuildCompletion {
            token,
            config,
            wood,
        } = completion;
        if !self.guard.is_current(token) {
            debug!("Rebuild {} is stale and was discarded", token.generation());
            return Ok(None);
        }
        let wood = wood
            .and_then(|wood| self.fit_wood(config.wood, wood))
            .inspect_err(|e| {
                error!("Rebuild {} failed: {}", token.generation(), e);
            })?;
        self.wood_cache.insert(config.wood, wood.clone());

        let typesetter = match &mut self.font {
            Font::Ready(typesetter) => typesetter,
            Font::Pending => {
                debug!("Rebuild {} waits for the font", token.generation());
                self.parked = Some(RebuildCompletion {
                    token,
                    config,
                    wood: Ok(wood),
                });
                return Ok(None);
            }
            Font::Failed => return Err(SignError::FontUnavailable),
        };

        let blueprint = build_blueprint(
            &config,
            wood,
            self.base_scale,
            self.magnification,
            self.max_texture_side,
            typesetter.as_mut(),
        );
        info!(
            "Rebuild {} complete: {} sign with {} wood",
            token.generation(),
            config.size.label(),
            config.wood,
        );
        let blueprint: &SignBlueprint = self.rendered.insert(blueprint);
        Ok(Some(blueprint))
    }

    fn fit_wood(
        &self,
        texture: WoodTexture,
        wood: Arc<RgbaImage>,
    ) -> Result<Arc<RgbaImage>, SignError> {
        if wood.width() == 0 || wood.height() == 0 {
            return Err(SignError::EmptyImage(format!("{} wood", texture)));
        }
        Ok(match fit_to_limit(&wood, self.max_texture_side) {
            Some(smaller) => Arc::new(smaller),
            None => wood,
        })
    }

    /// Make text rendering available. A rebuild that was waiting for the font
    /// is finished right away.
    pub fn install_typesetter(
        &mut self,
        typesetter: Box<dyn Typesetter>,
    ) -> Result<Option<&SignBlueprint>, SignError> {
        self.font = Font::Ready(typesetter);
        match self.parked.take() {
            Some(completion) => self.accept(completion),
            None => Ok(None),
        }
    }

    /// Record that the font could not be loaded. No sign is built from now on.
    pub fn font_failed(&mut self, reason: &SignError) {
        error!("{}", reason);
        self.font = Font::Failed;
        self.parked = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::typeset::testing::BlockTypesetter;
    use futures::{StreamExt, channel::oneshot, stream::FuturesUnordered};
    use image::Rgba;

    fn wood_of(texture: WoodTexture) -> Arc<RgbaImage> {
        let shade = match texture {
            WoodTexture::Oak => 180,
            WoodTexture::Dark => 70,
            WoodTexture::Acacia => 220,
        };
        Arc::new(RgbaImage::from_pixel(32, 16, Rgba([shade, 100, 50, 255])))
    }

    fn ready_model() -> SignModel {
        let mut model = SignModel::default();
        let _ = model.install_typesetter(Box::new(BlockTypesetter));
        model
    }

    fn complete(request: RebuildRequest) -> RebuildCompletion {
        let wood = wood_of(request.config.wood);
        futures::executor::block_on(request.resolve(futures::future::ready(Ok(wood))))
    }

    #[test]
    fn mutation_discards_and_accept_rebuilds() {
        let mut model = ready_model();
        let first = model.request_rebuild();
        assert!(model.accept(complete(first)).unwrap().is_some());

        let request = model.set_size(SignSize::Large);
        assert!(model.rendered().is_none());
        model.accept(complete(request)).unwrap();
        assert_eq!(model.rendered().unwrap().plank.transform.scale.x, 2.5);
    }

    #[test]
    fn toggling_the_pole_twice_restores_the_initial_sign() {
        let mut model = ready_model();
        let initial = model.request_rebuild();
        model.accept(complete(initial)).unwrap();
        let before = model.rendered().cloned().unwrap();

        let hidden = model.toggle_pole();
        model.accept(complete(hidden)).unwrap();
        assert!(model.rendered().unwrap().pole.is_none());

        let shown = model.toggle_pole();
        model.accept(complete(shown)).unwrap();
        assert_eq!(model.rendered(), Some(&before));
        assert_eq!(model.config(), &SignConfiguration::default());
    }

    fn arrival(
        rx: oneshot::Receiver<Arc<RgbaImage>>,
    ) -> impl Future<Output = Result<Arc<RgbaImage>, SignError>> {
        async move {
            rx.await.map_err(|_| SignError::TextureLoad {
                path: String::new(),
                reason: "sender dropped".into(),
            })
        }
    }

    /// Dark is requested before acacia and both loads are in flight.
    fn race(acacia_first: bool) -> SignModel {
        let mut model = ready_model();
        let (dark_tx, dark_rx) = oneshot::channel::<Arc<RgbaImage>>();
        let (acacia_tx, acacia_rx) = oneshot::channel::<Arc<RgbaImage>>();
        let dark = model.set_wood_texture(WoodTexture::Dark);
        let acacia = model.set_wood_texture(WoodTexture::Acacia);

        let mut pending = FuturesUnordered::new();
        pending.push(dark.resolve(arrival(dark_rx)));
        pending.push(acacia.resolve(arrival(acacia_rx)));

        let mut senders = vec![
            (dark_tx, wood_of(WoodTexture::Dark)),
            (acacia_tx, wood_of(WoodTexture::Acacia)),
        ];
        if acacia_first {
            senders.reverse();
        }
        for (tx, image) in senders {
            tx.send(image).unwrap();
            let completion = futures::executor::block_on(pending.next()).unwrap();
            let _ = model.accept(completion);
        }
        model
    }

    #[test]
    fn last_request_wins_when_it_loads_last() {
        let model = race(false);
        let sign = model.rendered().expect("acacia sign");
        assert_eq!(sign.wood_texture, WoodTexture::Acacia);
        assert_eq!(sign.wood, wood_of(WoodTexture::Acacia));
    }

    #[test]
    fn last_request_wins_when_it_loads_first() {
        let model = race(true);
        let sign = model.rendered().expect("acacia sign");
        assert_eq!(sign.wood_texture, WoodTexture::Acacia);
        assert_eq!(model.config().wood, WoodTexture::Acacia);
    }

    #[test]
    fn failed_wood_load_leaves_no_sign() {
        let mut model = ready_model();
        let request = model.set_wood_texture(WoodTexture::Dark);
        let completion = futures::executor::block_on(request.resolve(futures::future::ready(
            Err(SignError::TextureLoad {
                path: "textures/wood_dark.webp".into(),
                reason: "missing".into(),
            }),
        )));
        let result = model.accept(completion);
        assert!(matches!(result, Err(SignError::TextureLoad { .. })));
        assert!(model.rendered().is_none());
        assert!(model.cached_wood(WoodTexture::Dark).is_none());
    }

    #[test]
    fn completion_waits_for_the_font() {
        let mut model = SignModel::default();
        let request = model.request_rebuild();
        assert!(model.accept(complete(request)).unwrap().is_none());
        assert!(model.rendered().is_none());
        let built = model.install_typesetter(Box::new(BlockTypesetter)).unwrap();
        assert!(built.is_some());
    }

    #[test]
    fn without_a_font_the_sign_never_appears() {
        let mut model = SignModel::default();
        model.font_failed(&SignError::FontLoad("not a font".into()));
        let request = model.request_rebuild();
        assert!(matches!(
            model.accept(complete(request)),
            Err(SignError::FontUnavailable)
        ));
        assert!(model.rendered().is_none());
    }

    #[test]
    fn loaded_wood_is_cached() {
        let mut model = ready_model();
        assert!(model.cached_wood(WoodTexture::Oak).is_none());
        let request = model.request_rebuild();
        model.accept(complete(request)).unwrap();
        assert_eq!(
            model.cached_wood(WoodTexture::Oak),
            Some(wood_of(WoodTexture::Oak))
        );
    }

    fn complete_with(request: RebuildRequest, wood: RgbaImage) -> RebuildCompletion {
        futures::executor::block_on(request.resolve(futures::future::ready(Ok(Arc::new(wood)))))
    }

    #[test]
    fn empty_wood_is_refused() {
        let mut model = ready_model();
        let request = model.request_rebuild();
        let result = model.accept(complete_with(request, RgbaImage::new(0, 0)));
        assert!(matches!(result, Err(SignError::EmptyImage(_))));
        assert!(model.rendered().is_none());
        assert!(model.cached_wood(WoodTexture::Oak).is_none());
    }

    #[test]
    fn oversized_wood_is_fitted_to_the_texture_limit() {
        let settings = Settings {
            max_texture_side: 256,
            ..Settings::default()
        };
        let mut model = SignModel::new(&settings);
        let _ = model.install_typesetter(Box::new(BlockTypesetter));
        let request = model.request_rebuild();
        let wood = RgbaImage::from_pixel(1024, 512, Rgba([180, 100, 50, 255]));
        model.accept(complete_with(request, wood)).unwrap();

        let sign = model.rendered().expect("sign");
        assert_eq!(sign.wood.dimensions(), (256, 128));
        assert_eq!(sign.label.image.dimensions(), (256, 128));
        let cached = model.cached_wood(WoodTexture::Oak).expect("cached wood");
        assert_eq!(cached.dimensions(), (256, 128));
    }

    #[test]
    fn label_of_large_wood_fits_a_webgl2_device() {
        let limit = wgpu::Limits::downlevel_webgl2_defaults().max_texture_dimension_2d;
        let mut model = ready_model();
        assert_eq!(model.max_texture_side, limit);
        let request = model.request_rebuild();
        let wood = RgbaImage::from_pixel(1024, 512, Rgba([180, 100, 50, 255]));
        model.accept(complete_with(request, wood)).unwrap();

        let label = &model.rendered().expect("sign").label.image;
        assert!(label.width() <= limit && label.height() <= limit);
        assert_eq!(label.dimensions(), (2048, 1024));
    }
}
