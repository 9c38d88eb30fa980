//! Grow / Shrink paddle
//!
//! Both scale the paddle height and both restore the home size on unbind.
//! Sizes never stack past `[min_fraction, max_multiple] * home`.

use serde::{Deserialize, Serialize};

use super::{ActionCtx, ActionHooks, ActionKind};
use crate::tuning::ResizeTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeMode {
    Grow,
    Shrink,
}

#[derive(Debug, Clone)]
pub struct Resize {
    mode: ResizeMode,
    tuning: ResizeTuning,
}

impl Resize {
    pub fn new(mode: ResizeMode, tuning: ResizeTuning) -> Self {
        Self { mode, tuning }
    }

    fn factor(&self) -> f32 {
        match self.mode {
            ResizeMode::Grow => self.tuning.grow_factor,
            ResizeMode::Shrink => self.tuning.shrink_factor,
        }
    }

    /// The size action this one must not fight with
    fn opposing_kind(&self) -> ActionKind {
        match self.mode {
            ResizeMode::Grow => ActionKind::ShrinkPaddle,
            ResizeMode::Shrink => ActionKind::GrowPaddle,
        }
    }

    fn apply(&self, ctx: &mut ActionCtx<'_>) {
        let home = ctx.body.home_size().y;
        // Opposing effect active: scale from home instead of compounding on top of it
        let base = if ctx.partner == Some(self.opposing_kind()) {
            home
        } else {
            ctx.body.size.y
        };
        // Unvalidated tuning may hand us the bounds swapped
        let a = home * self.tuning.min_fraction;
        let b = home * self.tuning.max_multiple;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let height = (base * self.factor()).max(lo).min(hi);
        log::debug!("{:?} paddle height {} -> {}", self.mode, ctx.body.size.y, height);
        ctx.body.set_height(height);
    }
}

impl ActionHooks for Resize {
    fn on_assign(&mut self, ctx: &mut ActionCtx<'_>) {
        self.apply(ctx);
    }

    fn on_restore(&mut self, ctx: &mut ActionCtx<'_>) {
        self.apply(ctx);
    }

    fn on_unassign(&mut self, ctx: &mut ActionCtx<'_>) {
        ctx.body.reset_size();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::arena::Arena;
    use crate::sim::paddle::{PaddleBody, Side};
    use crate::tuning::Tuning;

    #[test]
    fn test_grow_clamps_at_max_multiple() {
        let tuning = ResizeTuning::default();
        let mut arena = Arena::standard(&Tuning::default());
        let mut body = PaddleBody::new(Side::Left);
        let home = body.home_size().y;
        let mut grow = Resize::new(ResizeMode::Grow, tuning.clone());
        let mut ctx = ActionCtx::new(&mut body, &mut arena, SIM_DT, None);

        grow.on_assign(&mut ctx);
        assert!((ctx.body.size.y - home * tuning.grow_factor).abs() < 1e-5);
        for _ in 0..10 {
            grow.on_restore(&mut ctx);
        }
        assert!((ctx.body.size.y - home * tuning.max_multiple).abs() < 1e-5);

        grow.on_unassign(&mut ctx);
        assert_eq!(ctx.body.size.y, home);
    }

    #[test]
    fn test_shrink_clamps_at_min_fraction() {
        let tuning = ResizeTuning::default();
        let mut arena = Arena::standard(&Tuning::default());
        let mut body = PaddleBody::new(Side::Right);
        let home = body.home_size().y;
        let mut shrink = Resize::new(ResizeMode::Shrink, tuning.clone());
        let mut ctx = ActionCtx::new(&mut body, &mut arena, SIM_DT, None);

        for _ in 0..10 {
            shrink.on_restore(&mut ctx);
        }
        assert!((ctx.body.size.y - home * tuning.min_fraction).abs() < 1e-5);
    }

    #[test]
    fn test_opposed_resize_scales_from_home() {
        let tuning = ResizeTuning {
            grow_factor: 2.0,
            shrink_factor: 0.5,
            ..ResizeTuning::default()
        };
        let mut arena = Arena::standard(&Tuning::default());
        let mut body = PaddleBody::new(Side::Left);
        let home = body.home_size().y;
        body.set_height(home * 2.0);

        let mut shrink = Resize::new(ResizeMode::Shrink, tuning);
        let mut ctx = ActionCtx::new(&mut body, &mut arena, SIM_DT, Some(ActionKind::GrowPaddle));
        shrink.on_assign(&mut ctx);
        assert!((ctx.body.size.y - home * 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_swapped_bounds_still_clamp() {
        let tuning = ResizeTuning {
            grow_factor: 10.0,
            min_fraction: 3.0,
            max_multiple: 0.5,
            ..ResizeTuning::default()
        };
        let mut arena = Arena::standard(&Tuning::default());
        let mut body = PaddleBody::new(Side::Left);
        let home = body.home_size().y;
        let mut grow = Resize::new(ResizeMode::Grow, tuning);
        let mut ctx = ActionCtx::new(&mut body, &mut arena, SIM_DT, None);

        grow.on_assign(&mut ctx);
        assert!((ctx.body.size.y - home * 3.0).abs() < 1e-5);
    }
}
