//! Cage: keeps an entity inside a rectangle
//!
//! Place it after the components whose movement it should limit.

use crate::component::{AttributeReadable, AttributeWritable, Component, FrameContext};
use crate::entity::Entity;
use crate::registry::{float_arg, require_args, ComponentRegistry};
use kiln_core::{AttributeValue, KilnError, Result};

pub struct Cage {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Cage {
    pub fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    fn from_args(args: &[AttributeValue]) -> Result<Self> {
        require_args("Cage", args, 4)?;
        Ok(Self::new(
            float_arg("Cage", args, 0)?,
            float_arg("Cage", args, 1)?,
            float_arg("Cage", args, 2)?,
            float_arg("Cage", args, 3)?,
        ))
    }
}

impl Component for Cage {
    fn update(&mut self, entity: &mut Entity, _ctx: &mut FrameContext<'_>) {
        let p = &mut entity.transform.position;
        // f32::clamp panics on inverted bounds
        if p.x < self.left {
            p.x = self.left;
        }
        if p.x > self.right {
            p.x = self.right;
        }
        if p.y < self.bottom {
            p.y = self.bottom;
        }
        if p.y > self.top {
            p.y = self.top;
        }
    }

    fn type_name(&self) -> Option<&str> {
        Some("Cage")
    }

    fn readable(&self) -> Option<&dyn AttributeReadable> {
        Some(self)
    }

    fn writable(&mut self) -> Option<&mut dyn AttributeWritable> {
        Some(self)
    }
}

impl AttributeReadable for Cage {
    fn get_attribute(&self, key: &str) -> Result<AttributeValue> {
        let v = match key {
            "top" => self.top,
            "left" => self.left,
            "bottom" => self.bottom,
            "right" => self.right,
            _ => return Err(KilnError::attribute_not_found("Cage", key)),
        };
        Ok(AttributeValue::Float(v))
    }
}

impl AttributeWritable for Cage {
    fn set_attribute(&mut self, key: &str, value: AttributeValue) -> Result<()> {
        let v = value.coerce_f32(key)?;
        match key {
            "top" => self.top = v,
            "left" => self.left = v,
            "bottom" => self.bottom = v,
            "right" => self.right = v,
            _ => return Err(KilnError::attribute_not_found("Cage", key)),
        }
        Ok(())
    }
}

pub(crate) fn register(registry: &mut ComponentRegistry) {
    registry.register("Cage", |args: &[AttributeValue]| -> Result<Box<dyn Component>> {
        Ok(Box::new(Cage::from_args(args)?))
    });
}
