//! The sign configurator flow.
//!
//! [`Configurator`] turns key presses into [`SignModel`] mutations, starts the
//! asset loads each rebuild needs and puts finished blueprints on screen. The
//! loads come back as [`SignEvent`]s; the model decides which of them are
//! still wanted.

use std::{collections::HashMap, sync::Arc};

use instant::Duration;
use log::{error, info, warn};
use winit::event::{DeviceEvent, ElementState, WindowEvent};

use crate::{
    backdrop::{Backdrop, BackdropQuad, GRADIENT_SIZE, radial_gradient},
    context::{Context, InitContext},
    controls::{ControlAction, TextEditor, describe, map_key},
    error::SignError,
    flow::{self, FlowConsturctor, GraphicsFlow, Out},
    render::Render,
    resources::{self, texture::fit_to_limit},
    settings::Settings,
    sign::{
        blueprint::SignBlueprint,
        model::SignModel,
        node::SignNode,
        rebuild::{RebuildCompletion, RebuildRequest},
        typeset::FontTypesetter,
    },
};

#[cfg(feature = "integration-tests")]
use crate::flow::ImageTestResult;

/// Results of the asynchronous loads the configurator starts.
pub enum SignEvent {
    FontLoaded(Result<FontTypesetter, SignError>),
    WoodLoaded(RebuildCompletion),
    BackdropLoaded(Result<image::RgbaImage, SignError>),
}

type SignOut = Out<SignModel, SignEvent>;

pub struct Configurator {
    settings: Settings,
    node: SignNode,
    editor: TextEditor,
    backdrop: Backdrop,
    quads: HashMap<Backdrop, BackdropQuad>,
    ctrl: bool,
    title_dirty: bool,
}

impl Configurator {
    pub fn new(settings: Settings) -> Self {
        let editor = TextEditor::from(&settings.initial.text);
        Self {
            settings,
            node: SignNode::new(),
            editor,
            backdrop: Backdrop::default(),
            quads: HashMap::new(),
            ctrl: false,
            title_dirty: true,
        }
    }

    fn load_font(&self) -> Box<dyn Future<Output = SignEvent>> {
        let root = self.settings.asset_dir.clone();
        let file = self.settings.font_file.clone();
        Box::new(async move {
            let font = resources::load_binary(&root, &file)
                .await
                .map_err(|e| SignError::FontLoad(format!("{}: {}", file, e)))
                .and_then(FontTypesetter::from_bytes);
            SignEvent::FontLoaded(font)
        })
    }

    /// Load the wood for `request`, from the cache when possible.
    fn load_wood(
        &self,
        state: &SignModel,
        request: RebuildRequest,
    ) -> Box<dyn Future<Output = SignEvent>> {
        let cached = state.cached_wood(request.config.wood);
        let root = self.settings.asset_dir.clone();
        let path = self.settings.wood_path(request.config.wood);
        Box::new(async move {
            let wood = async move {
                match cached {
                    Some(wood) => Ok(wood),
                    None => resources::load_image(&root, &path).await.map(Arc::new),
                }
            };
            SignEvent::WoodLoaded(request.resolve(wood).await)
        })
    }

    fn load_in_game_backdrop(&self) -> Box<dyn Future<Output = SignEvent>> {
        let root = self.settings.asset_dir.clone();
        let path = self.settings.in_game_backdrop.clone();
        Box::new(async move { SignEvent::BackdropLoaded(resources::load_image(&root, &path).await) })
    }

    /// The current sign is gone; fetch what its replacement needs.
    fn rebuild(&mut self, state: &SignModel, request: RebuildRequest) -> SignOut {
        self.node.discard();
        self.title_dirty = true;
        Out::FutEvent(vec![self.load_wood(state, request)])
    }

    fn apply(&mut self, ctx: &Context, state: &mut SignModel, action: ControlAction) -> SignOut {
        match action {
            ControlAction::SelectWood(wood) => {
                let request = state.set_wood_texture(wood);
                self.rebuild(state, request)
            }
            ControlAction::SelectSize(size) => {
                let request = state.set_size(size);
                self.rebuild(state, request)
            }
            ControlAction::TogglePole => {
                let request = state.toggle_pole();
                self.rebuild(state, request)
            }
            ControlAction::CycleBackdrop => self.cycle_backdrop(ctx),
            ControlAction::PreviousLine => {
                self.editor.select_previous();
                self.title_dirty = true;
                Out::Empty
            }
            ControlAction::NextLine => {
                self.editor.select_next();
                self.title_dirty = true;
                Out::Empty
            }
            ControlAction::Insert(text) => {
                if !self.editor.insert(&text) {
                    return Out::Empty;
                }
                let request = state.set_text(self.editor.to_sign_text());
                self.rebuild(state, request)
            }
            ControlAction::Backspace => {
                if !self.editor.backspace() {
                    return Out::Empty;
                }
                let request = state.set_text(self.editor.to_sign_text());
                self.rebuild(state, request)
            }
        }
    }

    fn cycle_backdrop(&mut self, ctx: &Context) -> SignOut {
        self.backdrop = self.backdrop.next();
        self.title_dirty = true;
        info!("Backdrop: {}", self.backdrop);
        if self.quads.contains_key(&self.backdrop) {
            return Out::Empty;
        }
        match self.backdrop {
            Backdrop::White => Out::Empty,
            Backdrop::Gradient => {
                let image = radial_gradient(GRADIENT_SIZE);
                let quad = BackdropQuad::new(&ctx.device, &ctx.queue, &image, "gradient_backdrop");
                self.quads.insert(Backdrop::Gradient, quad);
                Out::Empty
            }
            Backdrop::InGame => Out::FutEvent(vec![self.load_in_game_backdrop()]),
        }
    }

    fn present(&mut self, ctx: &Context, built: Result<Option<&SignBlueprint>, SignError>) {
        match built {
            Ok(Some(blueprint)) => self.node.show(&ctx.device, &ctx.queue, blueprint),
            Ok(None) => (),
            Err(SignError::FontUnavailable) => warn!("{}", SignError::FontUnavailable),
            // The model already logged why the rebuild failed.
            Err(_) => self.node.discard(),
        }
    }

    fn title(&self, state: &SignModel) -> String {
        let config = state.config();
        format!(
            "{} | {}",
            self.settings.title,
            describe(
                config.wood,
                config.size,
                config.show_pole,
                self.backdrop,
                self.editor.active(),
            )
        )
    }
}

impl GraphicsFlow<SignModel, SignEvent> for Configurator {
    fn on_init(&mut self, ctx: &mut Context, state: &mut SignModel) -> SignOut {
        self.settings.max_texture_side = ctx.device.limits().max_texture_dimension_2d;
        info!("Textures are limited to {} px", self.settings.max_texture_side);
        *state = SignModel::new(&self.settings);
        ctx.clear_colour = wgpu::Color::WHITE;
        ctx.set_title(&self.title(state));
        self.title_dirty = false;

        // The font goes first so the initial wood usually finds it installed.
        let request = state.request_rebuild();
        Out::FutEvent(vec![self.load_font(), self.load_wood(state, request)])
    }

    fn on_update(&mut self, _: &Context, state: &mut SignModel, _: Duration) -> SignOut {
        if !self.title_dirty {
            return Out::Empty;
        }
        self.title_dirty = false;
        let title = self.title(state);
        Out::Configure(Box::new(move |ctx: &mut Context| ctx.set_title(&title)))
    }

    fn on_tick(&mut self, _: &Context, _: &mut SignModel) -> SignOut {
        Out::Empty
    }

    fn on_device_events(&mut self, _: &Context, _: &mut SignModel, _: &DeviceEvent) -> SignOut {
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        ctx: &Context,
        state: &mut SignModel,
        event: &WindowEvent,
    ) -> SignOut {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.ctrl = modifiers.state().control_key();
                Out::Empty
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match map_key(&event.logical_key, event.text.as_deref(), self.ctrl) {
                    Some(action) => self.apply(ctx, state, action),
                    None => Out::Empty,
                }
            }
            _ => Out::Empty,
        }
    }

    fn on_custom_events(
        &mut self,
        ctx: &Context,
        state: &mut SignModel,
        event: SignEvent,
    ) -> Option<SignEvent> {
        match event {
            SignEvent::FontLoaded(Ok(typesetter)) => {
                info!("Font `{}` installed", typesetter.family());
                let built = state.install_typesetter(Box::new(typesetter));
                self.present(ctx, built);
            }
            SignEvent::FontLoaded(Err(e)) => state.font_failed(&e),
            SignEvent::WoodLoaded(completion) => {
                let built = state.accept(completion);
                self.present(ctx, built);
            }
            SignEvent::BackdropLoaded(Ok(image)) if image.width() == 0 || image.height() == 0 => {
                let e = SignError::EmptyImage(self.settings.in_game_backdrop.clone());
                error!("{}; the backdrop stays white", e);
            }
            SignEvent::BackdropLoaded(Ok(image)) => {
                let image = fit_to_limit(&image, self.settings.max_texture_side).unwrap_or(image);
                let quad = BackdropQuad::new(&ctx.device, &ctx.queue, &image, "in_game_backdrop");
                self.quads.insert(Backdrop::InGame, quad);
            }
            SignEvent::BackdropLoaded(Err(e)) => {
                error!("{}; the backdrop stays white", e);
            }
        }
        None
    }

    fn on_render(&self) -> Render<'_> {
        let backdrop = self
            .quads
            .get(&self.backdrop)
            .map(|quad| quad.render())
            .unwrap_or(Render::None);
        Render::Composed(vec![backdrop, self.node.render()])
    }

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _: &Context,
        state: &mut SignModel,
        _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        if state.rendered().is_some() && !self.node.is_empty() {
            Ok(ImageTestResult::Passed)
        } else {
            Ok(ImageTestResult::Waiting)
        }
    }
}

/// Open the configurator window and run until it is closed.
pub fn run(settings: Settings) -> anyhow::Result<()> {
    info!("Starting {}", settings.title);
    let configurator: FlowConsturctor<SignModel, SignEvent> = Box::new(move |_: InitContext| {
        Box::pin(async move {
            Box::new(Configurator::new(settings)) as Box<dyn GraphicsFlow<_, _>>
        })
    });
    flow::run(vec![configurator])
}
