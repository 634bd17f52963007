use super::*;
use crate::test_support::{
    call_log, calls, count, zebra_and_apple, Call, CallLog, RecordingAssistant, ScriptedUpload,
};

fn controller(log: &CallLog, upload: ScriptedUpload, events: &EventBus) -> PhotoGalleryController {
    PhotoGalleryController::new(
        Arc::new(RecordingAssistant::new(log)),
        Arc::new(upload),
        events,
    )
}

fn add_photo(src: &str, description: &str) -> Call {
    Call::AddPhoto {
        src: src.to_string(),
        description: description.to_string(),
    }
}

fn display(columns: u32) -> Call {
    Call::Display {
        columns,
        container: "photo-gallery".to_string(),
    }
}

#[test]
fn setup_rejects_invalid_arguments_without_configuring() {
    let log = call_log();
    let events = EventBus::new();
    let gallery = controller(&log, ScriptedUpload::new(&log), &events);

    for (columns, container) in [
        (0.0, "photo-gallery"),
        (-3.0, "photo-gallery"),
        (f64::NAN, "photo-gallery"),
        (3.0, ""),
        (3.0, "not a surface"),
    ] {
        let err = gallery
            .setup_photo_gallery(columns, container)
            .expect_err("invalid setup");
        assert!(matches!(err, GalleryError::InvalidArgument(_)));
    }
    assert_eq!(gallery.state(), ControllerState::Unconfigured);
    assert!(gallery.configuration().is_none());
}

#[test]
fn setup_moves_controller_to_configured_and_can_be_repeated() {
    let log = call_log();
    let events = EventBus::new();
    let gallery = controller(&log, ScriptedUpload::new(&log), &events);

    gallery.setup_photo_gallery(3.0, "photo-gallery").expect("setup");
    assert_eq!(gallery.state(), ControllerState::Configured);

    gallery.setup_photo_gallery(4.0, "photo-gallery").expect("setup again");
    let configuration = gallery.configuration().expect("configured");
    assert_eq!(configuration.columns.get(), 4);
}

#[test]
fn upload_photos_delegates_without_running_the_pipeline() {
    let log = call_log();
    let events = EventBus::new();
    let gallery = controller(&log, ScriptedUpload::new(&log), &events);
    gallery.setup_photo_gallery(3.0, "photo-gallery").expect("setup");

    gallery.upload_photos().expect("upload");

    assert_eq!(calls(&log), vec![Call::Upload]);
}

#[test]
fn refused_upload_surfaces_as_collaborator_failure() {
    let log = call_log();
    let events = EventBus::new();
    let gallery = controller(&log, ScriptedUpload::refusing(&log, "quota exceeded"), &events);

    let err = gallery.upload_photos().expect_err("refused");
    assert!(matches!(
        err,
        GalleryError::CollaboratorFailure {
            operation: "upload photos",
            ..
        }
    ));
}

#[test]
fn photos_uploaded_runs_fetch_build_register_sort_display_in_order() {
    let log = call_log();
    let events = EventBus::new();
    let upload = ScriptedUpload::new(&log).then_batch(zebra_and_apple());
    let gallery = controller(&log, upload, &events);
    gallery.setup_photo_gallery(3.0, "photo-gallery").expect("setup");

    events.publish(GalleryEvent::PhotosUploaded);

    assert_eq!(
        calls(&log),
        vec![
            Call::Fetch,
            add_photo("a.png", "Zebra"),
            add_photo("b.png", "Apple"),
            Call::Sort,
            display(3),
        ]
    );
    let names: Vec<String> = gallery
        .photos()
        .iter()
        .map(|photo| photo.display_name().to_string())
        .collect();
    assert_eq!(names, vec!["Zebra", "Apple"]);
    assert_eq!(gallery.registered_count(), 2);
}

#[test]
fn editing_modal_closed_only_sorts_and_displays() {
    let log = call_log();
    let events = EventBus::new();
    let upload = ScriptedUpload::new(&log).then_batch(zebra_and_apple());
    let gallery = controller(&log, upload, &events);
    gallery.setup_photo_gallery(2.0, "photo-gallery").expect("setup");
    events.publish(GalleryEvent::PhotosUploaded);
    log.lock().expect("log").clear();

    events.publish(GalleryEvent::EditingModalClosed);

    assert_eq!(calls(&log), vec![Call::Sort, display(2)]);
    assert_eq!(gallery.photos().len(), 2);
}

#[test]
fn working_set_accumulates_and_each_photo_is_registered_once() {
    let log = call_log();
    let events = EventBus::new();
    let upload = ScriptedUpload::new(&log)
        .then_batch(zebra_and_apple())
        .then_batch(vec![PhotoRecord::new("c.png", "Mango")]);
    let gallery = controller(&log, upload, &events);
    gallery.setup_photo_gallery(3.0, "photo-gallery").expect("setup");

    events.publish(GalleryEvent::PhotosUploaded);
    log.lock().expect("log").clear();
    events.publish(GalleryEvent::PhotosUploaded);

    assert_eq!(
        calls(&log),
        vec![Call::Fetch, add_photo("c.png", "Mango"), Call::Sort, display(3)]
    );
    assert_eq!(gallery.photos().len(), 3);
    assert_eq!(gallery.registered_count(), 3);
}

#[test]
fn failed_fetch_is_logged_and_the_run_still_sorts_and_displays() {
    let log = call_log();
    let events = EventBus::new();
    let upload = ScriptedUpload::new(&log).then_failure("storage offline");
    let gallery = controller(&log, upload, &events);
    gallery.setup_photo_gallery(3.0, "photo-gallery").expect("setup");

    events.publish(GalleryEvent::PhotosUploaded);

    assert_eq!(calls(&log), vec![Call::Fetch, Call::Sort, display(3)]);
    assert!(gallery.photos().is_empty());
}

#[test]
fn broadcasts_are_ignored_until_the_gallery_is_configured() {
    let log = call_log();
    let events = EventBus::new();
    let upload = ScriptedUpload::new(&log).then_batch(zebra_and_apple());
    let gallery = controller(&log, upload, &events);

    events.publish(GalleryEvent::PhotosUploaded);
    events.publish(GalleryEvent::EditingModalClosed);
    assert!(calls(&log).is_empty());

    gallery.setup_photo_gallery(3.0, "photo-gallery").expect("setup");
    events.publish(GalleryEvent::PhotosUploaded);
    assert_eq!(count(&log, |call| matches!(call, Call::AddPhoto { .. })), 2);
}

#[test]
fn assistant_failure_stops_the_run_before_display() {
    let log = call_log();
    let events = EventBus::new();
    let gallery = PhotoGalleryController::new(
        Arc::new(RecordingAssistant::failing(&log, "renderer crashed")),
        Arc::new(ScriptedUpload::new(&log).then_batch(zebra_and_apple())),
        &events,
    );
    gallery.setup_photo_gallery(3.0, "photo-gallery").expect("setup");

    events.publish(GalleryEvent::PhotosUploaded);

    assert_eq!(calls(&log), vec![Call::Fetch, add_photo("a.png", "Zebra")]);
    assert_eq!(gallery.registered_count(), 0);
}

#[test]
fn dropped_controller_stops_listening() {
    let log = call_log();
    let events = EventBus::new();
    let gallery = controller(&log, ScriptedUpload::new(&log), &events);
    assert_eq!(events.listener_count(GalleryEvent::PhotosUploaded), 1);
    assert_eq!(events.listener_count(GalleryEvent::EditingModalClosed), 1);

    drop(gallery);

    assert_eq!(events.listener_count(GalleryEvent::PhotosUploaded), 0);
    assert_eq!(events.listener_count(GalleryEvent::EditingModalClosed), 0);
}
