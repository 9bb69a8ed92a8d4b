use indexer_core::greedy_groups;

#[test]
fn empty_input_yields_no_groups() {
    assert!(greedy_groups(&[], 100).is_empty());
}

#[test]
fn single_small_file_is_one_group() {
    assert_eq!(greedy_groups(&[10], 100), vec![0..1]);
}

#[test]
fn group_closes_when_cumulative_size_reaches_limit() {
    // 40 + 40 = 80 < 100, adding 30 reaches 110 >= 100 and closes the group.
    let groups = greedy_groups(&[40, 40, 30, 5], 100);
    assert_eq!(groups, vec![0..3, 3..4]);
}

#[test]
fn exact_limit_closes_the_group() {
    let groups = greedy_groups(&[60, 40, 1], 100);
    assert_eq!(groups, vec![0..2, 2..3]);
}

#[test]
fn oversized_single_file_gets_its_own_group() {
    let groups = greedy_groups(&[500, 10, 10], 100);
    assert_eq!(groups, vec![0..1, 1..3]);
}

#[test]
fn groups_form_a_contiguous_partition_of_the_input() {
    let sizes = [7, 93, 12, 200, 1, 1, 1, 50, 49, 3];
    let limit = 100;
    let groups = greedy_groups(&sizes, limit);

    // No index dropped, duplicated or reordered.
    let mut covered = Vec::new();
    for g in &groups {
        covered.extend(g.clone());
    }
    assert_eq!(covered, (0..sizes.len()).collect::<Vec<_>>());

    // Every group except possibly the last reached the limit when it closed.
    for g in &groups[..groups.len() - 1] {
        let total: u64 = sizes[g.clone()].iter().sum();
        assert!(total >= limit, "group {g:?} closed below the limit");
    }
}

#[test]
fn files_under_limit_stay_in_one_group() {
    // Two files whose combined size is under the limit produce one subtask.
    assert_eq!(greedy_groups(&[20, 30], 100), vec![0..2]);
}
