//! 능력(Ability) 엔진.
//!
//! 역할 기반 접근 제어의 핵심입니다. 사용자의 역할로부터 선언적인
//! 권한 규칙 목록을 구성하고, `can(동작, 대상, 필드?)` 질의를 그
//! 목록에 대한 순수한 filter/fold로 평가합니다.
//!
//! # 평가 규칙
//!
//! - `Manage` 동작은 다른 모든 동작을 포괄합니다.
//! - 거부(deny) 규칙은 같은 (동작, 대상, 필드) 조합의 허용 규칙보다
//!   항상 우선합니다. 명시적 금지는 더 넓은 허용으로 덮을 수 없습니다.
//! - 어떤 규칙에도 해당하지 않는 질의는 거부됩니다 (default-deny).
//! - 타입 수준 질의([`Ability::can`])는 인스턴스 조건을 무시합니다.
//!   라우트 진입 시점처럼 대상 레코드를 아직 조회하지 않은 단계에서
//!   사용하며, 인스턴스/필드 수준 검사는 레코드 조회 후
//!   [`Ability::can_on`] / [`Ability::can_on_field`]로 다시 수행해야
//!   합니다.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{Role, User};

/// 권한 동작.
///
/// `Manage`는 나머지 모든 동작을 포함합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Manage,
}

/// 규칙이 적용되는 대상(리소스 타입).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Subject {
    /// 와일드카드 - 모든 리소스
    All,
    /// 사용자 리소스
    User,
}

/// 사용자 레코드의 필드.
///
/// 필드 수준 규칙(예: `role` 필드 수정 금지)에 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Name,
    Email,
    Password,
    Role,
}

/// 인스턴스 필드에 대한 조건 술어.
///
/// 규칙의 적용 범위를 조건을 만족하는 인스턴스로 제한합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// 대상의 id가 주어진 값과 같아야 함 (본인 확인)
    IdEquals(Uuid),
    /// 대상의 역할이 주어진 값이 아니어야 함
    RoleNot(Role),
}

impl Condition {
    /// 대상 인스턴스가 조건을 만족하는지 평가.
    pub fn matches(&self, target: &User) -> bool {
        match self {
            Condition::IdEquals(id) => target.id == *id,
            Condition::RoleNot(role) => target.role != *role,
        }
    }
}

/// 권한 규칙.
///
/// (동작 × 대상 × 조건 × 필드 × 허용/거부)의 태그된 레코드입니다.
/// 숨겨진 상태를 가진 빌더 대신 명시적인 규칙 목록으로 표현합니다.
#[derive(Debug, Clone)]
pub struct Rule {
    /// 동작
    pub action: Action,
    /// 대상
    pub subject: Subject,
    /// 인스턴스 조건 (모두 만족해야 규칙이 적용됨)
    pub conditions: Vec<Condition>,
    /// 규칙이 적용되는 필드 목록 (None이면 모든 필드)
    pub fields: Option<Vec<UserField>>,
    /// true면 거부(cannot) 규칙
    pub inverted: bool,
}

impl Rule {
    /// 허용 규칙 생성.
    pub fn allow(action: Action, subject: Subject) -> Self {
        Self {
            action,
            subject,
            conditions: Vec::new(),
            fields: None,
            inverted: false,
        }
    }

    /// 거부 규칙 생성.
    pub fn deny(action: Action, subject: Subject) -> Self {
        Self {
            inverted: true,
            ..Self::allow(action, subject)
        }
    }

    /// 인스턴스 조건 추가.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// 적용 필드 제한.
    #[must_use]
    pub fn on_fields(mut self, fields: Vec<UserField>) -> Self {
        self.fields = Some(fields);
        self
    }

    fn matches_action(&self, action: Action) -> bool {
        self.action == Action::Manage || self.action == action
    }

    fn matches_subject(&self, subject: Subject) -> bool {
        self.subject == Subject::All || self.subject == subject
    }

    fn matches_conditions(&self, target: &User) -> bool {
        self.conditions.iter().all(|c| c.matches(target))
    }

    /// 필드 매칭.
    ///
    /// 필드 제한이 없는 규칙은 항상 적용됩니다. 필드 제한이 있는
    /// 규칙은 질의가 해당 필드를 지목할 때 적용되고, 질의에 필드가
    /// 없으면 허용 규칙으로만 적용됩니다. 즉 `role` 필드만 금지하는
    /// 거부 규칙이 필드 없는 `can(update, User)` 질의를 막지 않습니다.
    fn matches_field(&self, field: Option<UserField>) -> bool {
        let Some(restricted) = &self.fields else {
            return true;
        };
        match field {
            Some(f) => restricted.contains(&f),
            None => !self.inverted,
        }
    }
}

/// 엔드포인트에 선언되는 권한 요구사항.
///
/// 권한 게이트가 검사하는 (동작, 대상) 쌍입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredRule {
    pub action: Action,
    pub subject: Subject,
}

impl RequiredRule {
    pub fn new(action: Action, subject: Subject) -> Self {
        Self { action, subject }
    }
}

/// 한 사용자에 대해 계산된 권한 규칙 집합.
///
/// 요청마다 새로 생성되며 저장되거나 캐시되지 않습니다.
#[derive(Debug, Clone)]
pub struct Ability {
    rules: Vec<Rule>,
}

impl Ability {
    /// 사용자의 역할로부터 규칙 집합 구성.
    ///
    /// | 역할 | 규칙 |
    /// |---|---|
    /// | admin | 모든 리소스에 manage |
    /// | manager | 전체 read; admin이 아닌 사용자 update; role 필드 update 금지 |
    /// | user | 본인 read/update; role 필드 update 금지 |
    pub fn for_user(user_id: Uuid, role: Role) -> Self {
        let mut rules = Vec::new();

        match role {
            Role::Admin => {
                rules.push(Rule::allow(Action::Manage, Subject::All));
            }
            Role::Manager => {
                rules.push(Rule::allow(Action::Read, Subject::All));
                rules.push(
                    Rule::allow(Action::Update, Subject::User)
                        .when(Condition::RoleNot(Role::Admin)),
                );
                rules.push(Rule::deny(Action::Update, Subject::User).on_fields(vec![UserField::Role]));
            }
            Role::User => {
                rules.push(
                    Rule::allow(Action::Read, Subject::User).when(Condition::IdEquals(user_id)),
                );
                rules.push(
                    Rule::allow(Action::Update, Subject::User).when(Condition::IdEquals(user_id)),
                );
                rules.push(Rule::deny(Action::Update, Subject::User).on_fields(vec![UserField::Role]));
            }
        }

        Self { rules }
    }

    /// 명시적 규칙 목록으로 구성 (테스트 및 특수 정책용).
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// 규칙 목록 참조.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// 타입 수준 권한 질의.
    ///
    /// 인스턴스 조건은 무시합니다. 대상 레코드 조회 전의 라우트
    /// 게이팅에 사용합니다.
    pub fn can(&self, action: Action, subject: Subject) -> bool {
        self.check(action, subject, None, None)
    }

    /// 타입 수준 + 필드 질의.
    pub fn can_field(&self, action: Action, subject: Subject, field: UserField) -> bool {
        self.check(action, subject, None, Some(field))
    }

    /// 인스턴스 수준 권한 질의.
    ///
    /// 대상 인스턴스가 허용 규칙의 조건을 만족해야 합니다.
    pub fn can_on(&self, action: Action, target: &User) -> bool {
        self.check(action, Subject::User, Some(target), None)
    }

    /// 인스턴스 수준 + 필드 질의.
    pub fn can_on_field(&self, action: Action, target: &User, field: UserField) -> bool {
        self.check(action, Subject::User, Some(target), Some(field))
    }

    /// 평가 본체.
    ///
    /// 매칭되는 규칙을 허용/거부로 분할하여, 허용 규칙이 하나 이상
    /// 매칭되고 거부 규칙이 하나도 매칭되지 않을 때만 허용합니다.
    fn check(
        &self,
        action: Action,
        subject: Subject,
        target: Option<&User>,
        field: Option<UserField>,
    ) -> bool {
        let mut allowed = false;

        for rule in &self.rules {
            if !rule.matches_action(action) || !rule.matches_subject(subject) {
                continue;
            }
            if let Some(target) = target {
                if !rule.matches_conditions(target) {
                    continue;
                }
            }
            if !rule.matches_field(field) {
                continue;
            }

            if rule.inverted {
                // 거부 우선: 매칭된 거부 규칙 하나면 전체 거부
                return false;
            }
            allowed = true;
        }

        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_user(id: Uuid, role: Role) -> User {
        User {
            id,
            name: "Test".to_string(),
            email: format!("{id}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_can_everything() {
        let ability = Ability::for_user(Uuid::new_v4(), Role::Admin);

        assert!(ability.can(Action::Manage, Subject::All));
        assert!(ability.can(Action::Create, Subject::User));
        assert!(ability.can(Action::Read, Subject::User));
        assert!(ability.can(Action::Update, Subject::User));
        assert!(ability.can(Action::Delete, Subject::User));
        // manage 권한은 role 필드 수정까지 포함한다
        assert!(ability.can_field(Action::Update, Subject::User, UserField::Role));

        let other = make_user(Uuid::new_v4(), Role::Admin);
        assert!(ability.can_on(Action::Update, &other));
        assert!(ability.can_on_field(Action::Update, &other, UserField::Role));
    }

    #[test]
    fn test_manager_rules() {
        let ability = Ability::for_user(Uuid::new_v4(), Role::Manager);

        // 전체 읽기 가능
        assert!(ability.can(Action::Read, Subject::All));
        assert!(ability.can(Action::Read, Subject::User));

        // 필드 없는 update는 타입 수준에서 허용
        assert!(ability.can(Action::Update, Subject::User));
        // role 필드는 거부가 항상 우선
        assert!(!ability.can_field(Action::Update, Subject::User, UserField::Role));
        // 다른 필드는 허용
        assert!(ability.can_field(Action::Update, Subject::User, UserField::Name));

        // 삭제/생성 권한 없음
        assert!(!ability.can(Action::Delete, Subject::User));
        assert!(!ability.can(Action::Create, Subject::User));
    }

    #[test]
    fn test_manager_cannot_update_admin_instance() {
        let ability = Ability::for_user(Uuid::new_v4(), Role::Manager);

        let admin = make_user(Uuid::new_v4(), Role::Admin);
        let plain = make_user(Uuid::new_v4(), Role::User);

        assert!(!ability.can_on(Action::Update, &admin));
        assert!(ability.can_on(Action::Update, &plain));
        assert!(!ability.can_on_field(Action::Update, &plain, UserField::Role));
        assert!(ability.can_on_field(Action::Update, &plain, UserField::Email));
    }

    #[test]
    fn test_user_owns_only_self() {
        let self_id = Uuid::new_v4();
        let ability = Ability::for_user(self_id, Role::User);

        let me = make_user(self_id, Role::User);
        let other = make_user(Uuid::new_v4(), Role::User);

        assert!(ability.can_on(Action::Read, &me));
        assert!(!ability.can_on(Action::Read, &other));

        assert!(ability.can_on(Action::Update, &me));
        assert!(!ability.can_on(Action::Update, &other));

        // 본인이라도 role 필드는 수정 불가
        assert!(!ability.can_on_field(Action::Update, &me, UserField::Role));
        assert!(ability.can_on_field(Action::Update, &me, UserField::Name));

        assert!(!ability.can(Action::Delete, Subject::User));
    }

    #[test]
    fn test_user_type_level_read_ignores_conditions() {
        // 타입 수준 검사에서 조건부 규칙은 조건 없이 매칭된다.
        // 라우트 게이트는 통과시키고 인스턴스 검사를 서비스 계층에 맡긴다.
        let ability = Ability::for_user(Uuid::new_v4(), Role::User);
        assert!(ability.can(Action::Read, Subject::User));
        assert!(ability.can(Action::Update, Subject::User));
    }

    #[test]
    fn test_deny_overrides_broad_allow() {
        // 전체 허용 + 특정 필드 거부를 동시에 구성하면 그 조합은 항상 거부
        let ability = Ability::from_rules(vec![
            Rule::allow(Action::Manage, Subject::All),
            Rule::deny(Action::Update, Subject::User).on_fields(vec![UserField::Role]),
        ]);

        assert!(!ability.can_field(Action::Update, Subject::User, UserField::Role));
        // 거부는 지목된 필드에만 적용된다
        assert!(ability.can_field(Action::Update, Subject::User, UserField::Name));
        assert!(ability.can(Action::Update, Subject::User));
        assert!(ability.can(Action::Delete, Subject::User));
    }

    #[test]
    fn test_deny_precedence_is_order_independent() {
        let forward = Ability::from_rules(vec![
            Rule::allow(Action::Update, Subject::User),
            Rule::deny(Action::Update, Subject::User).on_fields(vec![UserField::Role]),
        ]);
        let reverse = Ability::from_rules(vec![
            Rule::deny(Action::Update, Subject::User).on_fields(vec![UserField::Role]),
            Rule::allow(Action::Update, Subject::User),
        ]);

        for ability in [forward, reverse] {
            assert!(!ability.can_field(Action::Update, Subject::User, UserField::Role));
            assert!(ability.can(Action::Update, Subject::User));
        }
    }

    #[test]
    fn test_default_deny() {
        let empty = Ability::from_rules(Vec::new());
        assert!(!empty.can(Action::Read, Subject::User));
        assert!(!empty.can(Action::Manage, Subject::All));

        // 규칙이 다루지 않는 동작은 거부
        let ability = Ability::for_user(Uuid::new_v4(), Role::User);
        assert!(!ability.can(Action::Create, Subject::User));
    }

    #[test]
    fn test_conditions_all_must_hold() {
        let target_id = Uuid::new_v4();
        let ability = Ability::from_rules(vec![Rule::allow(Action::Update, Subject::User)
            .when(Condition::IdEquals(target_id))
            .when(Condition::RoleNot(Role::Admin))]);

        let matching = make_user(target_id, Role::User);
        let wrong_role = make_user(target_id, Role::Admin);
        let wrong_id = make_user(Uuid::new_v4(), Role::User);

        assert!(ability.can_on(Action::Update, &matching));
        assert!(!ability.can_on(Action::Update, &wrong_role));
        assert!(!ability.can_on(Action::Update, &wrong_id));
    }

    #[test]
    fn test_listing_filter_matches_role_expectations() {
        // 목록 필터링을 능력 엔진에 위임했을 때의 가시성
        let self_id = Uuid::new_v4();
        let records = vec![
            make_user(Uuid::new_v4(), Role::Admin),
            make_user(Uuid::new_v4(), Role::Manager),
            make_user(self_id, Role::User),
            make_user(Uuid::new_v4(), Role::User),
        ];

        let visible = |ability: &Ability| {
            records
                .iter()
                .filter(|u| ability.can_on(Action::Read, u))
                .count()
        };

        let admin = Ability::for_user(Uuid::new_v4(), Role::Admin);
        assert_eq!(visible(&admin), 4);

        // manager는 `read all` 규칙에 따라 전체를 본다
        let manager = Ability::for_user(Uuid::new_v4(), Role::Manager);
        assert_eq!(visible(&manager), 4);

        // 일반 사용자는 본인 레코드 하나만 본다
        let user = Ability::for_user(self_id, Role::User);
        assert_eq!(visible(&user), 1);
    }
}
