mod common;

use noticeboard::{
    domain::{NewNotice, NewPhoto},
    error::AppError,
    repository::{NoticeRepository, PhotoRepository, SqliteNoticeRepository, SqlitePhotoRepository},
};

fn new_notice(title: &str, publish: &str) -> NewNotice {
    NewNotice {
        title: title.to_string(),
        content: "Details inside".to_string(),
        author: "Committee".to_string(),
        publish_date_time: publish.to_string(),
        is_urgent: false,
        pdf_url: None,
        expiry_date: None,
    }
}

#[tokio::test]
async fn test_notice_crud() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteNoticeRepository::new(pool);

    // Create
    let mut request = new_notice("Boiler service", "2024-07-10T09:00");
    request.is_urgent = true;
    request.pdf_url = Some("http://board.test/uploads/notice-pdfs/1-boiler.pdf".to_string());
    request.expiry_date = Some("2024-07-31".to_string());

    let notice = repo.create(request).await?;
    assert_eq!(notice.title, "Boiler service");
    assert!(notice.is_urgent);
    assert_eq!(notice.expiry_date.as_deref(), Some("2024-07-31"));

    // Find by ID
    let found = repo.find_by_id(notice.id).await?;
    assert_eq!(found.map(|n| n.id), Some(notice.id));
    assert!(repo.find_by_id(notice.id + 100).await?.is_none());

    // Update
    let mut edit = new_notice("Boiler service (rescheduled)", "2024-07-10T09:00");
    edit.expiry_date = None;
    let updated = repo.update(notice.id, edit).await?;
    assert_eq!(updated.title, "Boiler service (rescheduled)");
    assert!(!updated.is_urgent);
    assert_eq!(updated.expiry_date, None);
    assert_eq!(updated.pdf_url, None);

    // List
    repo.create(new_notice("Second", "2024-07-11T09:00")).await?;
    assert_eq!(repo.list().await?.len(), 2);

    // Delete
    repo.delete(notice.id).await?;
    assert!(repo.find_by_id(notice.id).await?.is_none());
    assert!(matches!(repo.delete(notice.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        repo.update(notice.id, new_notice("Gone", "2024-07-10T09:00")).await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_malformed_values_are_stored_verbatim() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqliteNoticeRepository::new(pool);

    let mut request = new_notice("Imported", "sometime next week");
    request.expiry_date = Some("end of month".to_string());
    let notice = repo.create(request).await?;

    let stored = repo.find_by_id(notice.id).await?.expect("notice exists");
    assert_eq!(stored.publish_date_time, "sometime next week");
    assert_eq!(stored.published_at(), None);
    assert_eq!(stored.expiry_date.as_deref(), Some("end of month"));

    Ok(())
}

#[tokio::test]
async fn test_photo_crud_lists_newest_first() -> anyhow::Result<()> {
    let pool = common::test_pool().await?;
    let repo = SqlitePhotoRepository::new(pool);

    let first = repo.create(NewPhoto {
        url: "http://board.test/uploads/gallery-photos/1-garden.jpg".to_string(),
        caption: "Garden".to_string(),
    }).await?;
    let second = repo.create(NewPhoto {
        url: "http://board.test/uploads/gallery-photos/2-roof.jpg".to_string(),
        caption: "Roof terrace".to_string(),
    }).await?;

    let ids: Vec<i64> = repo.list().await?.into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    repo.delete(first.id).await?;
    assert!(repo.find_by_id(first.id).await?.is_none());
    assert!(matches!(repo.delete(first.id).await, Err(AppError::NotFound(_))));

    Ok(())
}
