#![cfg(feature = "integration-tests")]

use signwright::{
    context::Context,
    flow::{GraphicsFlow, ImageTestResult, Out},
    render::Render,
};

pub(crate) type Image = image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>;

pub(crate) struct State {
    frame_counter: u32,
    init_invocations: u32,
    update_invocations: u32,
    pub dummy_state: String,
}
impl State {
    pub fn new() -> Self {
        Self {
            frame_counter: 0,
            init_invocations: 0,
            update_invocations: 0,
            dummy_state: String::new(),
        }
    }

    pub fn frame(&mut self) {
        self.frame_counter += 1;
    }

    pub fn init(&mut self) {
        self.init_invocations += 1;
    }

    pub fn update(&mut self) {
        self.update_invocations += 1;
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn init_invocations(&self) -> u32 {
        self.init_invocations
    }

    pub fn update_invocations(&self) -> u32 {
        self.update_invocations
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub(crate) struct FrameCounter(pub(crate) u32);
impl FrameCounter {
    pub(crate) fn frame(&self) -> u32 {
        self.0
    }

    pub(crate) fn progress(&mut self) {
        self.0 += 1;
    }
}

/// Anything a golden image test can put on screen.
pub(crate) trait TestScene {
    fn render(&self) -> Render<'_>;
}

pub(crate) struct TestRender<T: TestScene> {
    pub(crate) scene: T,
    pub(crate) setup: fn(&mut Context),
    pub(crate) validate: fn(&Context, &FrameCounter, &Image) -> ImageTestResult,
}

impl<T: TestScene> GraphicsFlow<FrameCounter, ()> for TestRender<T> {
    fn on_init(&mut self, ctx: &mut Context, _: &mut FrameCounter) -> Out<FrameCounter, ()> {
        (self.setup)(ctx);
        Out::Empty
    }

    fn on_update(
        &mut self,
        _: &Context,
        state: &mut FrameCounter,
        _: std::time::Duration,
    ) -> Out<FrameCounter, ()> {
        state.progress();
        Out::Empty
    }

    fn on_tick(&mut self, _: &Context, _: &mut FrameCounter) -> Out<FrameCounter, ()> {
        Out::Empty
    }

    fn on_device_events(
        &mut self,
        _: &Context,
        _: &mut FrameCounter,
        _: &signwright::DeviceEvent,
    ) -> Out<FrameCounter, ()> {
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut FrameCounter,
        _: &signwright::WindowEvent,
    ) -> Out<FrameCounter, ()> {
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &Context, _: &mut FrameCounter, event: ()) -> Option<()> {
        Some(event)
    }

    fn on_render(&self) -> Render<'_> {
        self.scene.render()
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut FrameCounter,
        texture: &mut Image,
    ) -> Result<ImageTestResult, anyhow::Error> {
        Ok((self.validate)(ctx, state, texture))
    }
}

pub(crate) fn white() -> image::Rgba<u8> {
    image::Rgba([255, 255, 255, 255])
}

/// Runs the event loop with the flow built by `$make` until its validation
/// passes or fails.
#[macro_export]
macro_rules! golden_image_test {
    ($make:expr) => {{
        use crate::common::test_utils::FrameCounter;
        use signwright::flow::{FlowConsturctor, GraphicsFlow};
        let model_constructor: FlowConsturctor<FrameCounter, ()> = Box::new(|ctx| {
            Box::pin(async move {
                let g_flow: Box<dyn GraphicsFlow<FrameCounter, ()>> =
                    Box::new(($make)(ctx).await);
                g_flow
            })
        });

        signwright::flow::run(vec![model_constructor])
            .expect("Failed to run flow for integration test.");
    }};
}
