use crate::models::Photo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightboxStatus {
    ImageLoading,
    ImageLoaded,
    ImageFailed,
}

/// Full-screen view of a single selected photo.
#[derive(Debug, Default)]
pub struct Lightbox {
    selected: Option<(Photo, LightboxStatus)>,
}

impl Lightbox {
    pub fn open(&mut self, photo: Photo) {
        self.selected = Some((photo, LightboxStatus::ImageLoading));
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Photo> {
        self.selected.as_ref().map(|(photo, _)| photo)
    }

    pub fn status(&self) -> Option<LightboxStatus> {
        self.selected.as_ref().map(|(_, status)| *status)
    }

    pub fn image_loaded(&mut self, id: &str) {
        self.set_status(id, LightboxStatus::ImageLoaded);
    }

    pub fn image_failed(&mut self, id: &str) {
        self.set_status(id, LightboxStatus::ImageFailed);
    }

    pub fn retry(&mut self) {
        if let Some((_, status)) = &mut self.selected {
            if *status == LightboxStatus::ImageFailed {
                *status = LightboxStatus::ImageLoading;
            }
        }
    }

    // Load events for a photo that is no longer shown are dropped.
    fn set_status(&mut self, id: &str, next: LightboxStatus) {
        if let Some((photo, status)) = &mut self.selected {
            if photo.id == id {
                *status = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str) -> Photo {
        Photo {
            id: id.to_string(),
            public_id: id.to_string(),
            url: format!("https://res.cloudinary.com/demo/{id}.jpg"),
            width: 800,
            height: 1200,
            description: String::new(),
            category: "portrait".to_string(),
            alt: id.to_string(),
        }
    }

    #[test]
    fn test_open_load_close() {
        let mut lightbox = Lightbox::default();
        lightbox.open(photo("a"));
        assert_eq!(lightbox.status(), Some(LightboxStatus::ImageLoading));

        lightbox.image_loaded("a");
        assert_eq!(lightbox.status(), Some(LightboxStatus::ImageLoaded));

        lightbox.close();
        assert!(lightbox.selected().is_none());
        assert_eq!(lightbox.status(), None);
    }

    #[test]
    fn test_single_selection() {
        let mut lightbox = Lightbox::default();
        lightbox.open(photo("a"));
        lightbox.open(photo("b"));

        lightbox.image_failed("a");
        assert_eq!(lightbox.selected().unwrap().id, "b");
        assert_eq!(lightbox.status(), Some(LightboxStatus::ImageLoading));

        lightbox.image_failed("b");
        assert_eq!(lightbox.status(), Some(LightboxStatus::ImageFailed));
        lightbox.retry();
        assert_eq!(lightbox.status(), Some(LightboxStatus::ImageLoading));
    }
}
