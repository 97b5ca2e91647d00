use bevy::prelude::*;

use crate::tools::selection::error::SelectionError;

/// Marks the camera that picking rays are cast from.
#[derive(Component, Debug, Default)]
pub struct MainCamera;

pub type MainCameraQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Camera, &'static GlobalTransform),
    With<MainCamera>,
>;

/// Lazily resolved main camera, re-resolved once the cached one goes away or
/// is deactivated.
#[derive(Resource, Debug, Default)]
pub struct ActiveCameraCache {
    camera: Option<Entity>,
}

impl ActiveCameraCache {
    pub fn cached(&self) -> Option<Entity> {
        self.camera
    }

    pub fn resolve<'a>(
        &mut self,
        cameras: &'a MainCameraQuery,
    ) -> Result<(&'a Camera, &'a GlobalTransform), SelectionError> {
        if let Some((_, camera, transform)) = self
            .camera
            .and_then(|entity| cameras.get(entity).ok())
            .filter(|(_, camera, _)| camera.is_active)
        {
            return Ok((camera, transform));
        }

        match cameras.iter().find(|(_, camera, _)| camera.is_active) {
            Some((entity, camera, transform)) => {
                self.camera = Some(entity);
                Ok((camera, transform))
            }
            None => {
                self.camera = None;
                Err(SelectionError::NoActiveCamera)
            }
        }
    }
}
