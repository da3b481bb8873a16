//! End-to-end flow: build a project through a registry session, persist it,
//! reopen it, and check that every layer of the document survived.

use lienzo_events::{EventKind, EventNode, Instruction};
use lienzo_project::{Behavior, Instance, ObjectScope, Resource};
use lienzo_session::SessionRegistry;
use lienzo_variant::Variable;
use tempfile::tempdir;

#[test]
fn build_save_reopen_full_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("platformer.json");
    let mut registry = SessionRegistry::new();

    let id = registry
        .create(&path, "Platformer", None)
        .unwrap()
        .id()
        .to_string();

    let session = registry.get_mut(&id).unwrap();
    session
        .mutate(|p| {
            p.create_scene("Menu", None)?;
            p.create_scene("Level1", None)?;
            p.set_first_scene(Some("Menu".to_string()))?;

            p.create_object(ObjectScope::Global, "Hero", "sprite")?;
            p.object_mut(ObjectScope::Global, "Hero")?
                .add_behavior("Platformer", Behavior::new("PlatformBehavior"))?;

            p.global_variables
                .insert("score", Variable::from(0.0))?;

            p.create_instance("Level1", Instance::new("Hero", 100.0, 200.0))?;

            let events = &mut p.scene_mut("Level1")?.events;
            let node = EventNode::standard(
                vec![
                    Instruction::condition("KeyPressed", vec!["Space".into()], false),
                    Instruction::condition("IsOnFloor", vec!["Hero".into()], true),
                ],
                vec![Instruction::action("Jump", vec!["Hero".into()])],
            );
            events.insert(0, node)?;
            events.push(EventNode::new(EventKind::Group));
            events
                .tree_at_path_mut(&[1])?
                .push(EventNode::new(EventKind::Standard));

            p.resources
                .add("hero_sheet", Resource::new("image", "art/hero.png"))?;
            p.register_extension("platformer");
            Ok(())
        })
        .unwrap();

    // depth-limited listing before persisting
    {
        let session = registry.get(&id).unwrap();
        let events = &session.project().scene("Level1").unwrap().events;
        let summaries = events.summarize(0);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].condition_count, 2);
        assert_eq!(summaries[0].action_count, 1);
        assert_eq!(summaries[0].sub_event_count, 0);
        assert_eq!(summaries[1].sub_event_count, 1);
        assert!(summaries[1].sub_events.is_none());
    }

    registry.get_mut(&id).unwrap().save(None).unwrap();
    let saved = registry.get(&id).unwrap().project().clone();
    assert!(registry.close(&id, false).unwrap());

    let reopened = registry.open(&path, Some("reopened".to_string())).unwrap();
    assert!(!reopened.is_dirty());
    assert_eq!(reopened.project(), &saved);

    let project = reopened.project();
    assert_eq!(project.first_scene.as_deref(), Some("Menu"));
    assert_eq!(project.scene("Level1").unwrap().instances.len(), 1);
    assert!(project.used_extensions.contains("platformer"));
    assert!(project.resources.get("hero_sheet").is_some());
    assert_eq!(
        project
            .global_variables
            .get("score")
            .and_then(Variable::as_number),
        Some(0.0)
    );
}

#[test]
fn mutations_after_reopen_keep_invariants() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("game.json");
    let mut registry = SessionRegistry::new();

    registry
        .create(&path, "Game", Some("s1".to_string()))
        .unwrap()
        .mutate(|p| {
            p.create_scene("Level1", None)?;
            p.create_object(ObjectScope::Global, "Coin", "sprite")?;
            p.create_instance("Level1", Instance::new("Coin", 0.0, 0.0))
        })
        .unwrap();
    registry.close("s1", true).unwrap();

    let session = registry.open(&path, Some("s2".to_string())).unwrap();
    let rewritten = session
        .mutate(|p| p.rename_object(ObjectScope::Global, "Coin", "GoldCoin"))
        .unwrap();
    assert_eq!(rewritten, 1);
    assert!(session.is_dirty());

    // renames cascaded into the reloaded instance container
    let instance_names: Vec<String> = session
        .project()
        .scene("Level1")
        .unwrap()
        .instances
        .iter()
        .map(|i| i.object_name.clone())
        .collect();
    assert_eq!(instance_names, ["GoldCoin"]);
}
