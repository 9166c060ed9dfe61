#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
mod lifecycle {
    use signwright::{
        context::Context,
        flow::{FlowConsturctor, GraphicsFlow, ImageTestResult, Out},
        render::Render,
    };
    use wgpu::Color;

    use crate::common::test_utils::{Image, State};

    enum Event {
        Test,
    }

    struct GraphicsElement;

    impl GraphicsFlow<State, Event> for GraphicsElement {
        fn on_init(&mut self, ctx: &mut Context, state: &mut State) -> Out<State, Event> {
            ctx.clear_colour = Color::TRANSPARENT;
            assert_eq!(state.frame_counter(), 0);
            assert_eq!(state.init_invocations(), 0);
            assert_eq!(state.update_invocations(), 0);

            state.init();
            Out::Empty
        }

        fn on_update(
            &mut self,
            _: &Context,
            state: &mut State,
            _: std::time::Duration,
        ) -> Out<State, Event> {
            assert_eq!(state.frame_counter(), state.update_invocations());
            assert_eq!(state.init_invocations(), 1);
            state.frame();
            state.update();

            let serve_sencha: Box<dyn FnOnce(&mut State)> = Box::new(|state: &mut State| {
                state.dummy_state.push('🍵');
            });
            let serve_mate: Box<dyn FnOnce(&mut State)> = Box::new(|state: &mut State| {
                state.dummy_state.push('🧉');
            });
            match state.frame_counter() {
                3 => Out::FutEvent(vec![Box::new(async move { Event::Test })]),
                5 => Out::FutFn(vec![
                    Box::new(async move { serve_sencha }),
                    Box::new(async move { serve_mate }),
                ]),
                6 => Out::Configure(Box::new(|ctx: &mut Context| {
                    ctx.clear_colour = Color::WHITE;
                })),
                _ => Out::Empty,
            }
        }

        fn on_tick(&mut self, _: &Context, _: &mut State) -> Out<State, Event> {
            Out::Empty
        }

        fn on_device_events(
            &mut self,
            _: &Context,
            _: &mut State,
            _: &signwright::DeviceEvent,
        ) -> Out<State, Event> {
            Out::Empty
        }

        fn on_window_events(
            &mut self,
            _: &Context,
            _: &mut State,
            _: &signwright::WindowEvent,
        ) -> Out<State, Event> {
            Out::Empty
        }

        fn on_custom_events(&mut self, _: &Context, state: &mut State, _: Event) -> Option<Event> {
            // the event is sent in frame 3
            assert!(state.frame_counter() >= 3);
            assert!(state.update_invocations() >= 3);
            state.dummy_state.push('!');
            None
        }

        fn on_render(&self) -> Render<'_> {
            Render::None
        }

        fn render_to_texture(
            &self,
            ctx: &Context,
            state: &mut State,
            _: &mut Image,
        ) -> Result<ImageTestResult, anyhow::Error> {
            if state.frame_counter() <= 6 {
                return Ok(ImageTestResult::Waiting);
            }
            assert!(state.dummy_state.contains('!'));
            assert!(state.dummy_state.contains('🧉'));
            assert!(state.dummy_state.contains('🍵'));
            // one ascii char plus two 4-byte emojis
            assert_eq!(state.dummy_state.len(), 9, "{}", state.dummy_state);
            assert_eq!(ctx.clear_colour, Color::WHITE);
            Ok(ImageTestResult::Passed)
        }
    }

    #[test]
    fn should_run_every_lifecycle_hook() {
        let model_constructor: FlowConsturctor<State, Event> = Box::new(|_| {
            Box::pin(async move { Box::new(GraphicsElement) as Box<dyn GraphicsFlow<_, _>> })
        });

        if let Err(e) = signwright::flow::run(vec![model_constructor]) {
            panic!("{}", e);
        }
    }
}
