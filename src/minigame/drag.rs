//! Mouse drag-and-drop on the minigame panel.
//!
//! Positions here are panel-local: the panel root sits on the camera, so
//! the cursor's world position minus the root's position gives the point
//! under the pointer in the same space the puzzle is authored in.

use bevy::prelude::*;

use crate::shared::*;

#[derive(Component, Debug)]
pub struct MinigamePanel;

#[derive(Component, Debug, Clone)]
pub struct MinigameItem {
    pub id: ItemId,
    pub start: Vec2,
    pub size: Vec2,
    pub placed: bool,
}

#[derive(Component, Debug, Clone)]
pub struct DropZoneSlot {
    pub id: ZoneId,
    pub size: Vec2,
}

/// Present on the item being dragged.
#[derive(Component, Debug, Clone, Copy)]
pub struct Dragging {
    /// Pointer position relative to the item centre at pick-up.
    pub grab_offset: Vec2,
}

/// An item was dropped. `zone` is `None` when it landed outside every zone.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlacementAttemptEvent {
    pub item: ItemId,
    pub zone: Option<ZoneId>,
}

pub fn rect_contains(center: Vec2, size: Vec2, point: Vec2) -> bool {
    let half = size * 0.5;
    (point.x - center.x).abs() <= half.x && (point.y - center.y).abs() <= half.y
}

/// Topmost (last listed) rectangle under `point`.
pub fn hit_test<'a, T>(
    point: Vec2,
    rects: impl IntoIterator<Item = (&'a T, Vec2, Vec2)>,
) -> Option<&'a T>
where
    T: 'a,
{
    rects
        .into_iter()
        .filter(|(_, center, size)| rect_contains(*center, *size, point))
        .last()
        .map(|(value, _, _)| value)
}

fn pointer_local(input: &PlayerInput, panel: &GlobalTransform) -> Option<Vec2> {
    input
        .cursor_world
        .map(|cursor| cursor - panel.translation().truncate())
}

pub fn begin_drag(
    mut commands: Commands,
    input: Res<PlayerInput>,
    panel_q: Query<&GlobalTransform, With<MinigamePanel>>,
    items: Query<(Entity, &MinigameItem, &Transform), Without<Dragging>>,
    dragging: Query<(), With<Dragging>>,
) {
    if !input.pointer_pressed || !dragging.is_empty() {
        return;
    }
    let Ok(panel) = panel_q.get_single() else {
        return;
    };
    let Some(point) = pointer_local(&input, panel) else {
        return;
    };

    let candidates: Vec<(Entity, Vec2, Vec2)> = items
        .iter()
        .filter(|(_, item, _)| !item.placed)
        .map(|(entity, item, tf)| (entity, tf.translation.truncate(), item.size))
        .collect();
    let Some(&entity) = hit_test(point, candidates.iter().map(|(e, c, s)| (e, *c, *s))) else {
        return;
    };
    if let Ok((_, _, tf)) = items.get(entity) {
        commands.entity(entity).insert(Dragging {
            grab_offset: point - tf.translation.truncate(),
        });
    }
}

pub fn drag_items(
    input: Res<PlayerInput>,
    panel_q: Query<&GlobalTransform, With<MinigamePanel>>,
    mut dragged: Query<(&Dragging, &mut Transform)>,
) {
    if !input.pointer_held {
        return;
    }
    let Ok(panel) = panel_q.get_single() else {
        return;
    };
    let Some(point) = pointer_local(&input, panel) else {
        return;
    };
    for (drag, mut tf) in &mut dragged {
        let target = point - drag.grab_offset;
        tf.translation.x = target.x;
        tf.translation.y = target.y;
    }
}

/// On release, test the item centre against the drop zones.
pub fn end_drag(
    mut commands: Commands,
    input: Res<PlayerInput>,
    dragged: Query<(Entity, &MinigameItem, &Transform), With<Dragging>>,
    zones: Query<(&DropZoneSlot, &Transform)>,
    mut attempts: EventWriter<PlacementAttemptEvent>,
) {
    if !input.pointer_released {
        return;
    }
    let zone_rects: Vec<(ZoneId, Vec2, Vec2)> = zones
        .iter()
        .map(|(zone, tf)| (zone.id.clone(), tf.translation.truncate(), zone.size))
        .collect();

    for (entity, item, tf) in &dragged {
        commands.entity(entity).remove::<Dragging>();
        let centre = tf.translation.truncate();
        let zone = hit_test(centre, zone_rects.iter().map(|(id, c, s)| (id, *c, *s))).cloned();
        attempts.send(PlacementAttemptEvent {
            item: item.id.clone(),
            zone,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_edges() {
        let size = Vec2::new(10.0, 20.0);
        assert!(rect_contains(Vec2::ZERO, size, Vec2::new(5.0, 10.0)));
        assert!(!rect_contains(Vec2::ZERO, size, Vec2::new(5.1, 0.0)));
        assert!(!rect_contains(Vec2::ZERO, size, Vec2::new(0.0, -10.5)));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let rects = [
            ("bottom", Vec2::ZERO, Vec2::splat(100.0)),
            ("top", Vec2::new(10.0, 0.0), Vec2::splat(40.0)),
        ];
        let hit = hit_test(Vec2::new(12.0, 0.0), rects.iter().map(|(id, c, s)| (id, *c, *s)));
        assert_eq!(hit, Some(&"top"));
        let hit = hit_test(Vec2::new(-40.0, 0.0), rects.iter().map(|(id, c, s)| (id, *c, *s)));
        assert_eq!(hit, Some(&"bottom"));
        assert_eq!(
            hit_test(Vec2::new(500.0, 0.0), rects.iter().map(|(id, c, s)| (id, *c, *s))),
            None
        );
    }
}
