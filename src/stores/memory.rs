//! In-process store used by the test suite.
//!
//! All tables sit behind one mutex, so every operation is atomic. Unique
//! constraints and transactional preconditions mirror the Postgres schema.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use elysia_core::PaginationParams;
use elysia_models::admins::{AdminQueryParams, AdminStatus, AdminUser};
use elysia_models::approvals::{ApprovalDecision, ApprovalQueryParams, TeacherApproval};
use elysia_models::classes::{Class, ClassMember, ClassMemberDetail, ClassStatus, MemberStatus};
use elysia_models::problems::{Problem, ProblemQueryParams};
use elysia_models::students::{Student, StudentQueryParams};
use elysia_models::subjects::{Subject, SubjectQueryParams};
use elysia_models::teachers::{Teacher, TeacherQueryParams, TeacherStatus, VerificationStatus};

use super::{
    AdminStore, ApprovalStore, ClassStore, ProblemStore, StoreError, StoreResult, StudentStore,
    SubjectStore, TeacherStore,
};

#[derive(Debug, Default)]
struct Tables {
    students: BTreeMap<String, Student>,
    teachers: BTreeMap<String, Teacher>,
    approvals: BTreeMap<String, TeacherApproval>,
    admins: BTreeMap<String, AdminUser>,
    classes: BTreeMap<String, Class>,
    members: BTreeMap<(String, String), ClassMember>,
    subjects: BTreeMap<String, Subject>,
    problems: BTreeMap<i64, Problem>,
    next_problem_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock only happens inside a failing test.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn conflict(message: &str) -> StoreError {
    StoreError::Conflict(message.to_string())
}

fn paginate<T: Clone>(items: Vec<&T>, page: &PaginationParams) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let data = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.page_size() as usize)
        .cloned()
        .collect();
    (data, total)
}

fn newest_first<T>(items: &mut [&T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn find_student(&self, student_id: &str) -> StoreResult<Option<Student>> {
        Ok(self.lock().students.get(student_id).cloned())
    }

    async fn find_student_by_phone(&self, phone: &str) -> StoreResult<Option<Student>> {
        Ok(self
            .lock()
            .students
            .values()
            .find(|s| s.phone_number == phone)
            .cloned())
    }

    async fn find_student_by_number(&self, student_number: &str) -> StoreResult<Option<Student>> {
        Ok(self
            .lock()
            .students
            .values()
            .find(|s| s.student_number == student_number)
            .cloned())
    }

    async fn create_student(&self, student: &Student) -> StoreResult<()> {
        let mut tables = self.lock();
        if tables.students.contains_key(&student.student_id) {
            return Err(conflict("record already exists"));
        }
        for existing in tables.students.values() {
            if existing.phone_number == student.phone_number {
                return Err(conflict("phone number already registered"));
            }
            if existing.student_number == student.student_number {
                return Err(conflict("student number already registered"));
            }
        }
        tables
            .students
            .insert(student.student_id.clone(), student.clone());
        Ok(())
    }

    async fn update_student(&self, student: &Student) -> StoreResult<()> {
        let mut tables = self.lock();
        if let Some(existing) = tables.students.get_mut(&student.student_id) {
            *existing = student.clone();
        }
        Ok(())
    }

    async fn list_students(&self, params: &StudentQueryParams) -> StoreResult<(Vec<Student>, i64)> {
        let tables = self.lock();
        let mut items: Vec<&Student> = tables
            .students
            .values()
            .filter(|s| params.major.as_ref().is_none_or(|m| &s.major == m))
            .filter(|s| params.grade.as_ref().is_none_or(|g| &s.grade == g))
            .filter(|s| {
                params
                    .programming_level
                    .as_ref()
                    .is_none_or(|l| &s.programming_level == l)
            })
            .collect();
        newest_first(&mut items, |s| s.created_at);
        Ok(paginate(items, &params.pagination()))
    }
}

#[async_trait]
impl TeacherStore for MemoryStore {
    async fn find_teacher(&self, teacher_id: &str) -> StoreResult<Option<Teacher>> {
        Ok(self.lock().teachers.get(teacher_id).cloned())
    }

    async fn find_teacher_by_phone(&self, phone: &str) -> StoreResult<Option<Teacher>> {
        Ok(self
            .lock()
            .teachers
            .values()
            .find(|t| t.phone_number == phone)
            .cloned())
    }

    async fn find_teacher_by_employee_number(
        &self,
        number: &str,
    ) -> StoreResult<Option<Teacher>> {
        Ok(self
            .lock()
            .teachers
            .values()
            .find(|t| t.employee_number == number)
            .cloned())
    }

    async fn find_teacher_by_email(&self, email: &str) -> StoreResult<Option<Teacher>> {
        Ok(self
            .lock()
            .teachers
            .values()
            .find(|t| t.school_email == email)
            .cloned())
    }

    async fn create_teacher(
        &self,
        teacher: &Teacher,
        approval: &TeacherApproval,
    ) -> StoreResult<()> {
        let mut tables = self.lock();
        if tables.teachers.contains_key(&teacher.teacher_id) {
            return Err(conflict("record already exists"));
        }
        for existing in tables.teachers.values() {
            if existing.phone_number == teacher.phone_number {
                return Err(conflict("phone number already registered"));
            }
            if existing.employee_number == teacher.employee_number {
                return Err(conflict("employee number already registered"));
            }
            if existing.school_email == teacher.school_email {
                return Err(conflict("school email already registered"));
            }
        }
        if tables
            .approvals
            .values()
            .any(|a| a.teacher_id == approval.teacher_id)
        {
            return Err(conflict("approval record already exists"));
        }
        tables
            .teachers
            .insert(teacher.teacher_id.clone(), teacher.clone());
        tables
            .approvals
            .insert(approval.approval_id.clone(), approval.clone());
        Ok(())
    }

    async fn update_teacher(&self, teacher: &Teacher) -> StoreResult<()> {
        let mut tables = self.lock();
        if let Some(existing) = tables.teachers.get_mut(&teacher.teacher_id) {
            // verification fields are owned by the approval workflow
            let verification = (
                existing.verification_status,
                existing.verification_time,
                existing.verifier_id.clone(),
                existing.verification_remark.clone(),
            );
            *existing = teacher.clone();
            existing.verification_status = verification.0;
            existing.verification_time = verification.1;
            existing.verifier_id = verification.2;
            existing.verification_remark = verification.3;
        }
        Ok(())
    }

    async fn list_teachers(&self, params: &TeacherQueryParams) -> StoreResult<(Vec<Teacher>, i64)> {
        let tables = self.lock();
        let mut items: Vec<&Teacher> = tables
            .teachers
            .values()
            .filter(|t| params.department.as_ref().is_none_or(|d| &t.department == d))
            .filter(|t| {
                params
                    .verification_status
                    .is_none_or(|v| t.verification_status == v)
            })
            .filter(|t| params.status.is_none_or(|s| t.status == s))
            .collect();
        newest_first(&mut items, |t| t.created_at);
        Ok(paginate(items, &params.pagination()))
    }
}

#[async_trait]
impl ApprovalStore for MemoryStore {
    async fn find_approval(&self, approval_id: &str) -> StoreResult<Option<TeacherApproval>> {
        Ok(self.lock().approvals.get(approval_id).cloned())
    }

    async fn find_approval_by_teacher(
        &self,
        teacher_id: &str,
    ) -> StoreResult<Option<TeacherApproval>> {
        Ok(self
            .lock()
            .approvals
            .values()
            .find(|a| a.teacher_id == teacher_id)
            .cloned())
    }

    async fn list_approvals(
        &self,
        params: &ApprovalQueryParams,
    ) -> StoreResult<(Vec<TeacherApproval>, i64)> {
        let tables = self.lock();
        let name = params.name.as_ref().map(|n| n.to_lowercase());
        let mut items: Vec<&TeacherApproval> = tables
            .approvals
            .values()
            .filter(|a| params.status.is_none_or(|s| a.approval_status == s))
            .filter(|a| params.department.as_ref().is_none_or(|d| &a.department == d))
            .filter(|a| {
                name.as_ref()
                    .is_none_or(|n| a.teacher_name.to_lowercase().contains(n.as_str()))
            })
            .collect();
        newest_first(&mut items, |a| a.created_at);
        Ok(paginate(items, &params.pagination()))
    }

    async fn decide_approval(&self, decision: &ApprovalDecision) -> StoreResult<TeacherApproval> {
        let mut tables = self.lock();

        let approval = tables
            .approvals
            .get_mut(&decision.approval_id)
            .filter(|a| a.approval_status == VerificationStatus::Pending)
            .ok_or_else(|| StoreError::Rejected("approval already processed".into()))?;

        approval.approval_status = decision.status();
        approval.approver_id = Some(decision.approver_id.clone());
        approval.approver_name = decision.approver_name.clone();
        approval.approval_remark = decision.remark.clone();
        approval.approval_time = Some(decision.decided_at);
        approval.updated_at = decision.decided_at;
        let approval = approval.clone();

        if let Some(teacher) = tables.teachers.get_mut(&approval.teacher_id) {
            teacher.verification_status = decision.status();
            teacher.verification_time = Some(decision.decided_at);
            teacher.verifier_id = Some(decision.approver_id.clone());
            teacher.verification_remark = decision.remark.clone();
            if decision.approved {
                teacher.status = TeacherStatus::Active;
            }
            teacher.updated_at = decision.decided_at;
        }

        Ok(approval)
    }

    async fn delete_pending_approval(&self, approval_id: &str) -> StoreResult<bool> {
        let mut tables = self.lock();
        let pending = tables
            .approvals
            .get(approval_id)
            .is_some_and(|a| a.approval_status == VerificationStatus::Pending);
        if pending {
            tables.approvals.remove(approval_id);
        }
        Ok(pending)
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn find_admin(&self, admin_id: &str) -> StoreResult<Option<AdminUser>> {
        Ok(self.lock().admins.get(admin_id).cloned())
    }

    async fn find_admin_by_phone(&self, phone: &str) -> StoreResult<Option<AdminUser>> {
        Ok(self
            .lock()
            .admins
            .values()
            .find(|a| a.phone_number.as_deref() == Some(phone))
            .cloned())
    }

    async fn find_admin_by_username(&self, username: &str) -> StoreResult<Option<AdminUser>> {
        Ok(self
            .lock()
            .admins
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<AdminUser>> {
        Ok(self
            .lock()
            .admins
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn create_admin(&self, admin: &AdminUser) -> StoreResult<()> {
        let mut tables = self.lock();
        if tables.admins.contains_key(&admin.admin_id) {
            return Err(conflict("record already exists"));
        }
        for existing in tables.admins.values() {
            if existing.username == admin.username {
                return Err(conflict("username already exists"));
            }
            if existing.email == admin.email {
                return Err(conflict("email already exists"));
            }
            if admin.phone_number.is_some() && existing.phone_number == admin.phone_number {
                return Err(conflict("phone number already registered"));
            }
        }
        tables.admins.insert(admin.admin_id.clone(), admin.clone());
        Ok(())
    }

    async fn update_admin_password(
        &self,
        admin_id: &str,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        if let Some(admin) = self.lock().admins.get_mut(admin_id) {
            admin.password_hash = password_hash.to_string();
            admin.password_update_time = Some(at);
            admin.updated_at = at;
        }
        Ok(())
    }

    async fn update_admin_status(&self, admin_id: &str, status: AdminStatus) -> StoreResult<()> {
        if let Some(admin) = self.lock().admins.get_mut(admin_id) {
            admin.status = status;
            admin.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn record_admin_login(&self, admin_id: &str, at: DateTime<Utc>) -> StoreResult<()> {
        if let Some(admin) = self.lock().admins.get_mut(admin_id) {
            admin.last_login_time = Some(at);
            admin.login_fail_count = 0;
        }
        Ok(())
    }

    async fn record_admin_login_failure(&self, admin_id: &str) -> StoreResult<()> {
        if let Some(admin) = self.lock().admins.get_mut(admin_id) {
            admin.login_fail_count += 1;
        }
        Ok(())
    }

    async fn list_admins(&self, params: &AdminQueryParams) -> StoreResult<(Vec<AdminUser>, i64)> {
        let tables = self.lock();
        let mut items: Vec<&AdminUser> = tables
            .admins
            .values()
            .filter(|a| params.role.as_ref().is_none_or(|r| &a.role == r))
            .filter(|a| params.status.is_none_or(|s| a.status == s))
            .collect();
        newest_first(&mut items, |a| a.created_at);
        Ok(paginate(items, &params.pagination()))
    }
}

#[async_trait]
impl ClassStore for MemoryStore {
    async fn create_class(&self, class: &Class) -> StoreResult<()> {
        let mut tables = self.lock();
        if tables.classes.contains_key(&class.class_id) {
            return Err(conflict("record already exists"));
        }
        if tables
            .classes
            .values()
            .any(|c| c.class_code == class.class_code)
        {
            return Err(conflict("class code already exists"));
        }
        tables.classes.insert(class.class_id.clone(), class.clone());
        Ok(())
    }

    async fn find_class(&self, class_id: &str) -> StoreResult<Option<Class>> {
        Ok(self.lock().classes.get(class_id).cloned())
    }

    async fn find_class_by_code(&self, class_code: &str) -> StoreResult<Option<Class>> {
        Ok(self
            .lock()
            .classes
            .values()
            .find(|c| c.class_code == class_code)
            .cloned())
    }

    async fn update_class(&self, class: &Class) -> StoreResult<()> {
        let mut tables = self.lock();
        if let Some(existing) = tables.classes.get_mut(&class.class_id) {
            // head count is owned by join/leave
            let current_students = existing.current_students;
            *existing = class.clone();
            existing.current_students = current_students;
        }
        Ok(())
    }

    async fn list_teacher_classes(
        &self,
        teacher_id: &str,
        page: &PaginationParams,
    ) -> StoreResult<(Vec<Class>, i64)> {
        let tables = self.lock();
        let mut items: Vec<&Class> = tables
            .classes
            .values()
            .filter(|c| c.teacher_id == teacher_id)
            .collect();
        newest_first(&mut items, |c| c.created_at);
        Ok(paginate(items, page))
    }

    async fn list_student_classes(
        &self,
        student_id: &str,
        page: &PaginationParams,
    ) -> StoreResult<(Vec<Class>, i64)> {
        let tables = self.lock();
        let mut memberships: Vec<&ClassMember> = tables
            .members
            .values()
            .filter(|m| m.student_id == student_id && m.status == MemberStatus::Active)
            .collect();
        newest_first(&mut memberships, |m| m.join_time);
        let items: Vec<&Class> = memberships
            .into_iter()
            .filter_map(|m| tables.classes.get(&m.class_id))
            .collect();
        Ok(paginate(items, page))
    }

    async fn find_member(
        &self,
        class_id: &str,
        student_id: &str,
    ) -> StoreResult<Option<ClassMember>> {
        Ok(self
            .lock()
            .members
            .get(&(class_id.to_string(), student_id.to_string()))
            .cloned())
    }

    async fn join_class(
        &self,
        class_id: &str,
        student_id: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut tables = self.lock();
        let key = (class_id.to_string(), student_id.to_string());

        let already_joined = tables
            .members
            .get(&key)
            .is_some_and(|m| m.status == MemberStatus::Active);

        let class = tables
            .classes
            .get_mut(class_id)
            .ok_or_else(|| StoreError::Rejected("class not found".into()))?;
        if class.status != ClassStatus::Ongoing {
            return Err(StoreError::Rejected("class ended or archived".into()));
        }
        if already_joined {
            return Err(StoreError::Rejected("already joined".into()));
        }
        if class.is_full() {
            return Err(StoreError::Rejected("class full".into()));
        }
        class.current_students += 1;
        class.updated_at = at;

        tables.members.insert(
            key,
            ClassMember {
                class_id: class_id.to_string(),
                student_id: student_id.to_string(),
                join_time: at,
                status: MemberStatus::Active,
                remark: None,
            },
        );
        Ok(())
    }

    async fn leave_class(&self, class_id: &str, student_id: &str) -> StoreResult<()> {
        let mut tables = self.lock();
        let key = (class_id.to_string(), student_id.to_string());

        let member = tables
            .members
            .get_mut(&key)
            .filter(|m| m.status == MemberStatus::Active)
            .ok_or_else(|| StoreError::Rejected("not joined".into()))?;
        member.status = MemberStatus::Left;

        if let Some(class) = tables.classes.get_mut(class_id) {
            class.current_students = (class.current_students - 1).max(0);
            class.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_members(
        &self,
        class_id: &str,
        page: &PaginationParams,
    ) -> StoreResult<(Vec<ClassMemberDetail>, i64)> {
        let tables = self.lock();
        let mut members: Vec<&ClassMember> = tables
            .members
            .values()
            .filter(|m| m.class_id == class_id && m.status == MemberStatus::Active)
            .collect();
        members.sort_by_key(|m| m.join_time);

        let details: Vec<ClassMemberDetail> = members
            .into_iter()
            .filter_map(|m| {
                tables.students.get(&m.student_id).map(|s| ClassMemberDetail {
                    student_id: s.student_id.clone(),
                    student_name: s.student_name.clone(),
                    student_number: s.student_number.clone(),
                    major: s.major.clone(),
                    grade: s.grade.clone(),
                    join_time: m.join_time,
                })
            })
            .collect();
        Ok(paginate(details.iter().collect(), page))
    }
}

#[async_trait]
impl SubjectStore for MemoryStore {
    async fn create_subject(&self, subject: &Subject) -> StoreResult<()> {
        let mut tables = self.lock();
        if tables
            .subjects
            .values()
            .any(|s| s.subject_code == subject.subject_code)
        {
            return Err(conflict("subject code already exists"));
        }
        tables
            .subjects
            .insert(subject.subject_id.clone(), subject.clone());
        Ok(())
    }

    async fn find_subject(&self, subject_id: &str) -> StoreResult<Option<Subject>> {
        Ok(self.lock().subjects.get(subject_id).cloned())
    }

    async fn find_subject_by_code(&self, code: &str) -> StoreResult<Option<Subject>> {
        Ok(self
            .lock()
            .subjects
            .values()
            .find(|s| s.subject_code == code)
            .cloned())
    }

    async fn update_subject(&self, subject: &Subject) -> StoreResult<()> {
        if let Some(existing) = self.lock().subjects.get_mut(&subject.subject_id) {
            *existing = subject.clone();
        }
        Ok(())
    }

    async fn delete_subject(&self, subject_id: &str) -> StoreResult<bool> {
        Ok(self.lock().subjects.remove(subject_id).is_some())
    }

    async fn list_subjects(&self, params: &SubjectQueryParams) -> StoreResult<(Vec<Subject>, i64)> {
        let tables = self.lock();
        let mut items: Vec<&Subject> = tables
            .subjects
            .values()
            .filter(|s| {
                params
                    .category
                    .as_ref()
                    .is_none_or(|c| s.category.as_ref() == Some(c))
            })
            .filter(|s| params.status.is_none_or(|st| s.status == st))
            .collect();
        items.sort_by(|a, b| a.subject_code.cmp(&b.subject_code));
        Ok(paginate(items, &params.pagination()))
    }
}

#[async_trait]
impl ProblemStore for MemoryStore {
    async fn create_problem(&self, problem: &Problem) -> StoreResult<Problem> {
        let mut tables = self.lock();
        if tables
            .problems
            .values()
            .any(|p| p.title_slug == problem.title_slug)
        {
            return Err(conflict("title slug already exists"));
        }
        tables.next_problem_id += 1;
        let mut created = problem.clone();
        created.id = tables.next_problem_id;
        tables.problems.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_problem(&self, id: i64) -> StoreResult<Option<Problem>> {
        Ok(self.lock().problems.get(&id).cloned())
    }

    async fn find_problem_by_slug(&self, slug: &str) -> StoreResult<Option<Problem>> {
        Ok(self
            .lock()
            .problems
            .values()
            .find(|p| p.title_slug == slug)
            .cloned())
    }

    async fn update_problem(&self, problem: &Problem) -> StoreResult<()> {
        let mut tables = self.lock();
        if tables
            .problems
            .values()
            .any(|p| p.id != problem.id && p.title_slug == problem.title_slug)
        {
            return Err(conflict("title slug already exists"));
        }
        if let Some(existing) = tables.problems.get_mut(&problem.id) {
            *existing = problem.clone();
        }
        Ok(())
    }

    async fn delete_problem(&self, id: i64) -> StoreResult<bool> {
        Ok(self.lock().problems.remove(&id).is_some())
    }

    async fn list_problems(&self, params: &ProblemQueryParams) -> StoreResult<(Vec<Problem>, i64)> {
        let tables = self.lock();
        let items: Vec<&Problem> = tables
            .problems
            .values()
            .filter(|p| params.difficulty.is_none_or(|d| p.difficulty == d))
            .filter(|p| params.tag.as_ref().is_none_or(|t| p.tags.contains(t)))
            .collect();
        Ok(paginate(items, &params.pagination()))
    }
}
