use crate::db::PollStore;
use crate::error::PollError;
use crate::models::{Poll, Requester};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPoll {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub room_id: String,
    pub options: Vec<String>,
}

pub async fn create_poll(
    store: &dyn PollStore,
    request: NewPoll,
    owner_id: Option<String>,
    now: DateTime<Utc>,
) -> Result<Poll, PollError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(PollError::InvalidPoll("title must not be empty".to_string()));
    }

    let options: Vec<String> = request
        .options
        .into_iter()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();
    if options.is_empty() {
        return Err(PollError::InvalidPoll("at least one option is required".to_string()));
    }

    let poll = Poll::new(
        title.to_string(),
        request.description,
        request.room_id,
        owner_id,
        options,
        now,
    );
    store.insert_poll(&poll).await?;

    info!("Created poll {} in room {} with {} options", poll.id, poll.room_id, poll.options.len());
    Ok(poll)
}

// Loads the poll and checks the requester owns it or is an admin
async fn manageable_poll(store: &dyn PollStore, poll_id: &str, requester: &Requester) -> Result<Poll, PollError> {
    let poll = store
        .get_poll(poll_id)
        .await?
        .ok_or_else(|| PollError::PollNotFound(poll_id.to_string()))?;

    if !requester.may_manage(&poll) {
        warn!("User {} tried to modify poll {} owned by {:?}", requester.user_id, poll.id, poll.owner_id);
        return Err(PollError::Forbidden {
            poll_id: poll.id,
            user_id: requester.user_id.clone(),
        });
    }
    Ok(poll)
}

pub async fn end_poll(store: &dyn PollStore, poll_id: &str, requester: &Requester) -> Result<(), PollError> {
    manageable_poll(store, poll_id, requester).await?;
    store.set_poll_active(poll_id, false).await?;
    info!("Ended poll {}", poll_id);
    Ok(())
}

/// Deletes a poll with its options and votes. Only the owner or an admin may.
pub async fn delete_poll(store: &dyn PollStore, poll_id: &str, requester: &Requester) -> Result<(), PollError> {
    manageable_poll(store, poll_id, requester).await?;
    store.delete_poll(poll_id).await?;
    info!("User {} deleted poll {}", requester.user_id, poll_id);
    Ok(())
}

/// Polls owned by the requester, newest first.
pub async fn list_my_polls(store: &dyn PollStore, requester: &Requester) -> Result<Vec<Poll>, PollError> {
    Ok(store.list_polls_by_owner(&requester.user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{Role, Vote, VoteSource};
    use chrono::Duration;

    fn user(id: &str) -> Requester {
        Requester { user_id: id.to_string(), role: Role::User }
    }

    fn request(title: &str, options: &[&str]) -> NewPoll {
        NewPoll {
            title: title.to_string(),
            description: None,
            room_id: "room-1".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn create_poll_stores_trimmed_options() {
        let store = MemoryStore::new();
        let poll = create_poll(&store, request(" Quiz ", &["A", "  ", " B "]), Some("teacher".to_string()), Utc::now())
            .await
            .unwrap();

        assert_eq!(poll.title, "Quiz");
        let texts: Vec<&str> = poll.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B"]);
        assert_eq!(store.get_poll(&poll.id).await.unwrap(), Some(poll));
    }

    #[tokio::test]
    async fn create_poll_rejects_missing_options() {
        let store = MemoryStore::new();
        let err = create_poll(&store, request("Quiz", &[" "]), None, Utc::now()).await.unwrap_err();
        assert!(matches!(err, PollError::InvalidPoll(_)));

        let err = create_poll(&store, request("  ", &["A"]), None, Utc::now()).await.unwrap_err();
        assert!(matches!(err, PollError::InvalidPoll(_)));
    }

    #[tokio::test]
    async fn end_poll_deactivates() {
        let store = MemoryStore::new();
        let owner = user("teacher");
        let poll = create_poll(&store, request("Quiz", &["A", "B"]), Some("teacher".to_string()), Utc::now())
            .await
            .unwrap();

        end_poll(&store, &poll.id, &owner).await.unwrap();

        assert!(!store.get_poll(&poll.id).await.unwrap().unwrap().is_active);
        assert!(matches!(
            end_poll(&store, "missing", &owner).await,
            Err(PollError::PollNotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_poll_requires_owner_or_admin() {
        let store = MemoryStore::new();
        let poll = create_poll(&store, request("Quiz", &["A", "B"]), Some("teacher".to_string()), Utc::now())
            .await
            .unwrap();
        let vote = Vote::new(&poll.id, &poll.options[0].id, "btn-1", VoteSource::IotRoom, Utc::now());
        store.record_vote(&vote).await.unwrap();

        let err = delete_poll(&store, &poll.id, &user("student")).await.unwrap_err();
        assert!(matches!(err, PollError::Forbidden { ref user_id, .. } if user_id == "student"));
        assert!(store.get_poll(&poll.id).await.unwrap().is_some());

        let admin = Requester { user_id: "root".to_string(), role: Role::Admin };
        delete_poll(&store, &poll.id, &admin).await.unwrap();

        assert!(store.get_poll(&poll.id).await.unwrap().is_none());
        assert!(store.votes_for_poll(&poll.id).await.is_empty());
        assert!(matches!(
            delete_poll(&store, &poll.id, &admin).await,
            Err(PollError::PollNotFound(_))
        ));
    }

    #[tokio::test]
    async fn owner_can_delete_own_poll() {
        let store = MemoryStore::new();
        let poll = create_poll(&store, request("Quiz", &["A"]), Some("teacher".to_string()), Utc::now())
            .await
            .unwrap();

        delete_poll(&store, &poll.id, &user("teacher")).await.unwrap();
        assert!(store.get_poll(&poll.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_my_polls_filters_by_owner_newest_first() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let first = create_poll(&store, request("First", &["A"]), Some("teacher".to_string()), now - Duration::hours(2))
            .await
            .unwrap();
        let second = create_poll(&store, request("Second", &["A"]), Some("teacher".to_string()), now)
            .await
            .unwrap();
        create_poll(&store, request("Theirs", &["A"]), Some("other".to_string()), now).await.unwrap();
        create_poll(&store, request("Nobody's", &["A"]), None, now).await.unwrap();

        let titles: Vec<String> = list_my_polls(&store, &user("teacher"))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec![second.title, first.title]);
        assert!(list_my_polls(&store, &user("stranger")).await.unwrap().is_empty());
    }
}
