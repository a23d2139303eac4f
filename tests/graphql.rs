use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use helpers::{
    assert_generated, basic_success_assert, typegen_command_with_fake_dir,
    INTROSPECTION_SCHEMA_PATH,
};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::process::Command;

mod helpers;

#[test]
fn compile_query_with_fragment() {
    basic_success_assert(
        "
fragment MenuShort on StorefrontMenu {
  id
  name
}

query GetMenu($shopID: String!, $id: String!) {
  storefrontMenus(shop_id: $shopID, ids: [$id]) {
    ...MenuShort
  }
}
",
        &[
            (
                "types.ts",
                "
export type ArbitraryObjectType = any;

export interface MenuShortFragment {
  id: string;
  name: string;
}

export interface GetMenuQuery {
  storefrontMenus: Array<MenuShortFragment> | null;
}

export interface GetMenuQueryVariables {
  id: string;
  shopID: string;
}

export interface GetMenuQueryMeta {
  result: GetMenuQuery;
  variables: GetMenuQueryVariables;
  kind: \"graphql-operation\";
}
",
            ),
            (
                "fragments/MenuShort.ts",
                "export default \"fragment MenuShort on StorefrontMenu{id name}\\n\";",
            ),
            (
                "operations/GetMenuQuery.ts",
                "
import MenuShort from \"../fragments/MenuShort\";
import type { GetMenuQueryMeta } from \"../types\";

export default (MenuShort + \"query GetMenu($shopID:String!,$id:String!){storefrontMenus(shop_id:$shopID,ids:[$id]){...MenuShort}}\\n\") as unknown as GetMenuQueryMeta;
",
            ),
        ],
    );
}

#[test]
fn compile_spread_alongside_fields_builds_intersection() {
    basic_success_assert(
        "
fragment MenuBase on StorefrontMenu {
  id
}

query GetMenuDetail($id: String!) {
  menu(id: $id) {
    name
    ...MenuBase
  }
}
",
        &[(
            "types.ts",
            "
export type ArbitraryObjectType = any;

export interface MenuBaseFragment {
  id: string;
}

export interface GetMenuDetailQuery {
  menu: (MenuBaseFragment & {
    name: string;
  }) | null;
}

export interface GetMenuDetailQueryVariables {
  id: string;
}

export interface GetMenuDetailQueryMeta {
  result: GetMenuDetailQuery;
  variables: GetMenuDetailQueryVariables;
  kind: \"graphql-operation\";
}
",
        )],
    );
}

#[test]
fn compile_transitive_fragment_dependencies() {
    basic_success_assert(
        "
fragment MenuItems on StorefrontMenu {
  items {
    id
  }
}

fragment MenuFull on StorefrontMenu {
  name
  ...MenuItems
}

query FullMenu($id: String!) {
  menu(id: $id) {
    ...MenuFull
  }
}
",
        &[
            (
                "fragments/MenuFull.ts",
                "export default \"fragment MenuFull on StorefrontMenu{name ...MenuItems}\\n\";",
            ),
            (
                "operations/FullMenuQuery.ts",
                "
import MenuFull from \"../fragments/MenuFull\";
import MenuItems from \"../fragments/MenuItems\";
import type { FullMenuQueryMeta } from \"../types\";

export default (MenuFull + MenuItems + \"query FullMenu($id:String!){menu(id:$id){...MenuFull}}\\n\") as unknown as FullMenuQueryMeta;
",
            ),
        ],
    );
}

#[test]
fn compile_named_type_closure_through_input_objects() {
    basic_success_assert(
        "
query SearchMenus($filter: MenuFilter) {
  searchMenus(filter: $filter) {
    id
    status
  }
}
",
        &[(
            "types.ts",
            "
export type ArbitraryObjectType = any;

export interface MenuFilter {
  flags?: Array<MenuFlag> | null;
  nested?: MenuScope | null;
  text?: string | null;
}

export type MenuFlag = \"FEATURED\" | \"HIDDEN\";

export interface MenuScope {
  limit?: number | null;
  shopID: string;
}

export type MenuStatus = \"DRAFT\" | \"PUBLISHED\";

export interface SearchMenusQuery {
  searchMenus: Array<{
    id: string;
    status: MenuStatus;
  }>;
}

export interface SearchMenusQueryVariables {
  filter?: MenuFilter | null;
}

export interface SearchMenusQueryMeta {
  result: SearchMenusQuery;
  variables: SearchMenusQueryVariables;
  kind: \"graphql-operation\";
}
",
        )],
    );
}

#[test]
fn compile_custom_scalar_as_arbitrary_object() {
    basic_success_assert(
        "
query MenuSettings($id: String!) {
  menu(id: $id) {
    settings
  }
}
",
        &[(
            "types.ts",
            "
export type ArbitraryObjectType = any;

export interface MenuSettingsQuery {
  menu: {
    settings: ArbitraryObjectType | null;
  } | null;
}

export interface MenuSettingsQueryVariables {
  id: string;
}

export interface MenuSettingsQueryMeta {
  result: MenuSettingsQuery;
  variables: MenuSettingsQueryVariables;
  kind: \"graphql-operation\";
}
",
        )],
    );
}

#[test]
fn compile_mutation_with_input_object_variables() {
    basic_success_assert(
        "
mutation RenameMenu($id: String!, $input: MenuInput!) {
  updateMenu(id: $id, input: $input) {
    id
  }
}
",
        &[(
            "types.ts",
            "
export type ArbitraryObjectType = any;

export interface MenuInput {
  name: string;
  status?: MenuStatus | null;
  tags?: Array<string> | null;
}

export type MenuStatus = \"DRAFT\" | \"PUBLISHED\";

export interface RenameMenuMutation {
  updateMenu: {
    id: string;
  } | null;
}

export interface RenameMenuMutationVariables {
  id: string;
  input: MenuInput;
}

export interface RenameMenuMutationMeta {
  result: RenameMenuMutation;
  variables: RenameMenuMutationVariables;
  kind: \"graphql-operation\";
}
",
        )],
    );
}

#[test]
fn compile_subscription_against_query_root() {
    basic_success_assert(
        "
subscription MenuFeed($id: String!) {
  menu(id: $id) {
    id
  }
}
",
        &[(
            "types.ts",
            "
export type ArbitraryObjectType = any;

export interface MenuFeedSubscription {
  menu: {
    id: string;
  } | null;
}

export interface MenuFeedSubscriptionVariables {
  id: string;
}

export interface MenuFeedSubscriptionMeta {
  result: MenuFeedSubscription;
  variables: MenuFeedSubscriptionVariables;
  kind: \"graphql-operation\";
}
",
        )],
    );
}

#[test]
fn compile_field_aliases_and_typename() {
    basic_success_assert(
        "
query AliasedMenu($id: String!) {
  first: menu(id: $id) {
    __typename
    id
  }
}
",
        &[(
            "types.ts",
            "
export type ArbitraryObjectType = any;

export interface AliasedMenuQuery {
  first: {
    __typename: string;
    id: string;
  } | null;
}

export interface AliasedMenuQueryVariables {
  id: string;
}

export interface AliasedMenuQueryMeta {
  result: AliasedMenuQuery;
  variables: AliasedMenuQueryVariables;
  kind: \"graphql-operation\";
}
",
        )],
    );
}

#[test]
fn compile_with_js_suffix_option() {
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir
        .child("file.graphql")
        .write_str(
            "
fragment MenuShort on StorefrontMenu {
  id
}

query GetMenu($shopID: String!, $id: String!) {
  storefrontMenus(shop_id: $shopID, ids: [$id]) {
    ...MenuShort
  }
}
",
        )
        .unwrap();
    cmd.arg("--js-suffix");
    cmd.assert().success();
    assert_generated(
        &temp_dir,
        "operations/GetMenuQuery.ts",
        "
import MenuShort from \"../fragments/MenuShort.js\";
import type { GetMenuQueryMeta } from \"../types.js\";

export default (MenuShort + \"query GetMenu($shopID:String!,$id:String!){storefrontMenus(shop_id:$shopID,ids:[$id]){...MenuShort}}\\n\") as unknown as GetMenuQueryMeta;
",
    );
}

#[test]
fn compile_with_introspection_json_schema() {
    let mut cmd = Command::cargo_bin("typegen").unwrap();
    let temp_dir = assert_fs::TempDir::new().unwrap();
    temp_dir
        .child("viewer.graphql")
        .write_str("query GetViewer {\n  viewer {\n    id\n    role\n  }\n}\n")
        .unwrap();
    cmd.arg("graphql")
        .arg(temp_dir.path())
        .arg("--schema")
        .arg(INTROSPECTION_SCHEMA_PATH);
    cmd.assert().success();
    assert_generated(
        &temp_dir,
        "types.ts",
        "
export type ArbitraryObjectType = any;

export type ViewerRole = \"ADMIN\" | \"MEMBER\";

export interface GetViewerQuery {
  viewer: {
    id: string;
    role: ViewerRole | null;
  } | null;
}

export interface GetViewerQueryVariables {}

export interface GetViewerQueryMeta {
  result: GetViewerQuery;
  variables: GetViewerQueryVariables;
  kind: \"graphql-operation\";
}
",
    );
}

#[test]
fn anonymous_operation_fails() {
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir
        .child("file.graphql")
        .write_str("query {\n  menu(id: \"1\") {\n    id\n  }\n}\n")
        .unwrap();
    let assertion = contains("Script does not support anonymous operations.")
        .and(contains("file.graphql:1:"));
    cmd.assert().failure().stdout(assertion);
}

#[test]
fn duplicate_fragment_definition_fails() {
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir
        .child("a.graphql")
        .write_str("fragment MenuShort on StorefrontMenu {\n  id\n}\n")
        .unwrap();
    temp_dir
        .child("b.graphql")
        .write_str(
            "
fragment MenuShort on StorefrontMenu {
  name
}

query GetMenu($id: String!) {
  menu(id: $id) {
    ...MenuShort
  }
}
",
        )
        .unwrap();
    cmd.assert()
        .failure()
        .stdout(contains("duplicate definition of fragment `MenuShort`"));
}

#[test]
fn unknown_field_suggests_similar_names() {
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir
        .child("file.graphql")
        .write_str("query GetMenu($id: String!) {\n  menu(id: $id) {\n    nmae\n  }\n}\n")
        .unwrap();
    let assertion = contains("unknown field `nmae` on type `StorefrontMenu`")
        .and(contains("Did you mean"))
        .and(contains("file.graphql:3:"));
    cmd.assert().failure().stdout(assertion);
}

#[test]
fn unknown_fragment_spread_fails() {
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir
        .child("file.graphql")
        .write_str("query GetMenu($id: String!) {\n  menu(id: $id) {\n    ...Missing\n  }\n}\n")
        .unwrap();
    cmd.assert()
        .failure()
        .stdout(contains("unknown spread fragment name `Missing`"));
}

#[test]
fn inline_fragment_is_unsupported() {
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir
        .child("file.graphql")
        .write_str(
            "query GetMenu($id: String!) {\n  menu(id: $id) {\n    ... on StorefrontMenu {\n      id\n    }\n  }\n}\n",
        )
        .unwrap();
    cmd.assert()
        .failure()
        .stdout(contains("inline fragment spreads are not implemented yet"));
}

#[test]
fn unused_fragment_fails_unless_allowed() {
    let source = "
fragment Unspread on StorefrontMenu {
  id
}

query GetMenu($id: String!) {
  menu(id: $id) {
    id
  }
}
";
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir.child("file.graphql").write_str(source).unwrap();
    cmd.assert()
        .failure()
        .stdout(contains("fragment `Unspread` is never used"));

    let (mut allowed_cmd, allowed_dir) = typegen_command_with_fake_dir();
    allowed_dir.child("file.graphql").write_str(source).unwrap();
    allowed_cmd.arg("--allow-unused-fragments");
    allowed_cmd.assert().success();
    allowed_dir.child("fragments/Unspread.ts").assert(
        predicates::path::exists(),
    );
}

#[test]
fn deprecated_field_use_warns() {
    let source = "
query GetMenu($id: String!) {
  menu(id: $id) {
    legacyHandle
  }
}
";
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir.child("file.graphql").write_str(source).unwrap();
    let assertion = contains("use of deprecated field `legacyHandle` on type `StorefrontMenu`")
        .and(contains("1 warning emitted"));
    cmd.assert().success().stdout(assertion);

    let (mut quiet_cmd, quiet_dir) = typegen_command_with_fake_dir();
    quiet_dir.child("file.graphql").write_str(source).unwrap();
    quiet_cmd.arg("--quiet");
    quiet_cmd
        .assert()
        .success()
        .stdout(contains("deprecated").not());
}

#[test]
fn output_is_deterministic_and_idempotent() {
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir
        .child("file.graphql")
        .write_str(
            "
fragment MenuShort on StorefrontMenu {
  id
}

query GetMenu($shopID: String!, $id: String!) {
  storefrontMenus(shop_id: $shopID, ids: [$id]) {
    ...MenuShort
  }
}
",
        )
        .unwrap();
    cmd.assert().success();
    let first = std::fs::read(temp_dir.path().join("types.ts")).unwrap();

    let mut second_cmd = Command::cargo_bin("typegen").unwrap();
    second_cmd
        .arg("graphql")
        .arg(temp_dir.path())
        .arg("--schema")
        .arg(helpers::SDL_SCHEMA_PATH)
        .arg("--quiet");
    second_cmd.assert().success();
    let second = std::fs::read(temp_dir.path().join("types.ts")).unwrap();
    assert_eq!(first, second);
    temp_dir
        .child("types.ts.unused")
        .assert(predicates::path::missing());
}

#[test]
fn orphan_outputs_are_renamed_in_quiet_mode() {
    let (mut cmd, temp_dir) = typegen_command_with_fake_dir();
    temp_dir
        .child("file.graphql")
        .write_str(
            "
fragment Old on StorefrontMenu {
  id
}

query GetMenu($id: String!) {
  menu(id: $id) {
    ...Old
  }
}
",
        )
        .unwrap();
    cmd.assert().success();
    temp_dir
        .child("fragments/Old.ts")
        .assert(predicates::path::exists());

    temp_dir
        .child("file.graphql")
        .write_str("query GetMenu($id: String!) {\n  menu(id: $id) {\n    id\n  }\n}\n")
        .unwrap();
    let mut second_cmd = Command::cargo_bin("typegen").unwrap();
    second_cmd
        .arg("graphql")
        .arg(temp_dir.path())
        .arg("--schema")
        .arg(helpers::SDL_SCHEMA_PATH)
        .arg("--quiet");
    second_cmd.assert().success();
    temp_dir
        .child("fragments/Old.ts")
        .assert(predicates::path::missing());
    temp_dir
        .child("fragments/Old.ts.unused")
        .assert(predicates::path::exists());
}
